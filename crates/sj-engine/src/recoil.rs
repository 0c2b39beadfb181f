//! Recoil state machine for struck bodies.

use crate::config::RecoilConfig;

/// Displacement below which a returning body counts as at rest.
pub const REST_EPSILON: f32 = 1e-4;

/// Where a body is in its strike/return cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecoilPhase {
    /// At rest, zero displacement.
    #[default]
    Idle,
    /// Hit on this frame; displacement snapped to its struck offset.
    Struck,
    /// Easing back toward rest.
    Returning,
}

/// Runtime state for one recoiling body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecoilState {
    phase: RecoilPhase,
    /// Normalized displacement, 0 at rest and 1 at full travel.
    displacement: f32,
}

impl RecoilState {
    /// A body at rest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RecoilPhase {
        self.phase
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    /// Scene offset along the body's recoil axis.
    pub fn offset(&self, config: &RecoilConfig) -> f32 {
        config.offset(self.displacement)
    }

    /// Enter `Struck` from any phase. The newest strike always wins.
    pub fn strike(&mut self, config: &RecoilConfig, velocity: u8) {
        self.phase = RecoilPhase::Struck;
        self.displacement = config.dampening.apply(velocity);
    }

    /// Advance one frame without a strike.
    ///
    /// Displacement falls linearly at the configured return rate and never
    /// goes below zero. The body reports `Idle` from the first frame that
    /// begins already at rest.
    pub fn advance(&mut self, config: &RecoilConfig, delta: f32) {
        match self.phase {
            RecoilPhase::Idle => {}
            RecoilPhase::Struck | RecoilPhase::Returning => {
                if self.displacement > REST_EPSILON {
                    let step = config.return_rate() * delta;
                    self.displacement = (self.displacement - step).max(0.0);
                    self.phase = RecoilPhase::Returning;
                } else {
                    self.rest();
                }
            }
        }
    }

    /// Snap to rest.
    pub fn rest(&mut self) {
        self.phase = RecoilPhase::Idle;
        self.displacement = 0.0;
    }

    /// Whether the body is displaced or about to settle.
    pub fn is_active(&self) -> bool {
        self.phase != RecoilPhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::velocity_dampening;
    use approx::assert_abs_diff_eq;

    #[test]
    fn starts_idle() {
        let state = RecoilState::new();
        assert_eq!(state.phase(), RecoilPhase::Idle);
        assert_eq!(state.displacement(), 0.0);
        assert!(!state.is_active());
    }

    #[test]
    fn strike_snaps_to_dampened_displacement() {
        let config = RecoilConfig::BASS_DRUM;
        let mut state = RecoilState::new();
        state.strike(&config, 64);
        assert_eq!(state.phase(), RecoilPhase::Struck);
        assert_eq!(state.displacement(), velocity_dampening(64));
        assert_abs_diff_eq!(state.offset(&config), -3.0 * velocity_dampening(64));
    }

    #[test]
    fn struck_then_returning() {
        let config = RecoilConfig::BASS_DRUM;
        let mut state = RecoilState::new();
        state.strike(&config, 127);
        state.advance(&config, 0.01);
        assert_eq!(state.phase(), RecoilPhase::Returning);
        assert!(state.displacement() < 1.0);
    }

    #[test]
    fn idle_advance_is_noop() {
        let config = RecoilConfig::MALLET_BAR;
        let mut state = RecoilState::new();
        state.advance(&config, 1.0);
        assert_eq!(state, RecoilState::new());
    }

    #[test]
    fn converges_without_overshoot() {
        let config = RecoilConfig::STICK_DRUM;
        let mut state = RecoilState::new();
        state.strike(&config, 127);

        let delta = 1.0 / 60.0;
        let mut frames = 0;
        while state.is_active() {
            state.advance(&config, delta);
            assert!(state.displacement() >= 0.0);
            frames += 1;
            assert!(frames < 1000, "recoil never settled");
        }
        // 1.0 / (22 / 2) per second = ~0.09 s, plus the settling frame
        assert!(frames <= 8, "took {} frames", frames);
        assert_eq!(state.displacement(), 0.0);
    }

    #[test]
    fn large_delta_clamps_at_rest() {
        let config = RecoilConfig::MALLET_BAR;
        let mut state = RecoilState::new();
        state.strike(&config, 100);
        state.advance(&config, 1.0);
        assert_eq!(state.displacement(), 0.0);
        assert_eq!(state.phase(), RecoilPhase::Returning);
        state.advance(&config, 1.0);
        assert_eq!(state.phase(), RecoilPhase::Idle);
    }

    #[test]
    fn restrike_overrides_return() {
        let config = RecoilConfig::BASS_DRUM;
        let mut state = RecoilState::new();
        state.strike(&config, 127);
        state.advance(&config, 0.05);
        state.strike(&config, 30);
        assert_eq!(state.phase(), RecoilPhase::Struck);
        assert_eq!(state.displacement(), velocity_dampening(30));
    }

    #[test]
    fn silent_strike_settles_next_frame() {
        let config = RecoilConfig::BASS_DRUM;
        let mut state = RecoilState::new();
        state.strike(&config, 0);
        assert_eq!(state.phase(), RecoilPhase::Struck);
        state.advance(&config, 0.01);
        assert_eq!(state.phase(), RecoilPhase::Idle);
    }
}
