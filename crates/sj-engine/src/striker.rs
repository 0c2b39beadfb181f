//! Approach/strike calculator for rotating strikers.
//!
//! A striker's angle is 0 at the strike extreme and `max_angle` when fully
//! raised. While a strike approaches, the angle is a closed-form function of
//! time-to-onset and tempo rather than an accumulated ease, so it reaches 0
//! exactly at onset whatever the frame rate.

use sj_ir::{NoteEvent, TempoResolver};

use crate::config::{Approach, StrikerConfig};

/// Unclamped approach angle with `time_to_onset` seconds left before a
/// strike at `slope` degrees per second.
pub fn approach_angle(slope: f64, time_to_onset: f64) -> f64 {
    slope * time_to_onset
}

/// Runtime angle of one striker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikerState {
    /// Degrees above the strike extreme.
    angle: f32,
}

impl StrikerState {
    /// A fully raised striker.
    pub fn new(config: &StrikerConfig) -> Self {
        Self { angle: config.max_angle }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Raised out of frame at or above `max_angle`; shown otherwise.
    pub fn is_visible(&self, config: &StrikerConfig) -> bool {
        self.angle < config.max_angle
    }

    /// Land on the strike extreme.
    pub fn strike(&mut self) {
        self.angle = 0.0;
    }

    /// Return to fully raised immediately.
    pub fn raise(&mut self, config: &StrikerConfig) {
        self.angle = config.max_angle;
    }

    /// Move toward the next strike for a frame in which nothing struck.
    ///
    /// A tempo-driven striker follows the approach line toward `upcoming`
    /// once that line dips below `max_angle`; until then, and always for
    /// snap strikers or with nothing upcoming, it eases back up at the
    /// fixed return rate.
    pub fn approach<R: TempoResolver + ?Sized>(
        &mut self,
        config: &StrikerConfig,
        upcoming: Option<&NoteEvent>,
        time: f64,
        delta: f32,
        tempo: &R,
    ) {
        let proposed = match (config.approach, upcoming) {
            (Approach::TempoDriven, Some(next)) => {
                let slope = config.approach_slope(tempo.tempo_before(next.onset_ticks));
                approach_angle(slope, next.onset_seconds - time)
            }
            _ => f64::INFINITY,
        };

        if proposed > config.max_angle as f64 {
            self.angle = (self.angle + config.return_rate * delta).min(config.max_angle);
        } else {
            self.angle = (proposed as f32).clamp(0.0, config.max_angle);
        }
    }

    /// Whether the striker is on its approach line toward `upcoming`.
    pub fn is_approaching(&self, config: &StrikerConfig, upcoming: Option<&NoteEvent>) -> bool {
        config.approach == Approach::TempoDriven && upcoming.is_some() && self.is_visible(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sj_ir::{Tempo, TempoMap, DEFAULT_TEMPO};

    fn map() -> TempoMap {
        TempoMap::constant(480, DEFAULT_TEMPO).unwrap()
    }

    fn hit_at(seconds: f64) -> NoteEvent {
        NoteEvent::new(60, 100, (seconds * 960.0) as u64, seconds)
    }

    #[test]
    fn starts_raised_and_hidden() {
        let config = StrikerConfig::STICK;
        let s = StrikerState::new(&config);
        assert_eq!(s.angle(), 50.0);
        assert!(!s.is_visible(&config));
    }

    #[test]
    fn far_strike_stays_raised() {
        let config = StrikerConfig::STICK;
        let mut s = StrikerState::new(&config);
        s.approach(&config, Some(&hit_at(2.0)), 0.0, 1.0 / 60.0, &map());
        assert_eq!(s.angle(), 50.0);
        assert!(!s.is_visible(&config));
    }

    #[test]
    fn near_strike_follows_approach_line() {
        let config = StrikerConfig::STICK;
        let mut s = StrikerState::new(&config);
        // 480 deg/s * 0.1 s = 48 degrees
        s.approach(&config, Some(&hit_at(2.0)), 1.9, 1.0 / 60.0, &map());
        assert_abs_diff_eq!(s.angle(), 48.0, epsilon = 1e-3);
        assert!(s.is_visible(&config));
        assert!(s.is_approaching(&config, Some(&hit_at(2.0))));
    }

    #[test]
    fn approach_reaches_zero_at_onset() {
        let config = StrikerConfig::STICK;
        let mut s = StrikerState::new(&config);
        s.approach(&config, Some(&hit_at(2.0)), 2.0, 0.01, &map());
        assert_eq!(s.angle(), 0.0);
    }

    #[test]
    fn landing_time_is_tempo_invariant() {
        let config = StrikerConfig::STICK;
        let hit = hit_at(2.0);
        for bpm in [60.0, 120.0, 200.0] {
            let tempo = TempoMap::constant(480, Tempo::from_bpm(bpm)).unwrap();
            let mut s = StrikerState::new(&config);
            s.approach(&config, Some(&hit), 1.99, 0.01, &tempo);
            assert!(s.angle() > 0.0);
            s.approach(&config, Some(&hit), 2.0, 0.01, &tempo);
            assert_eq!(s.angle(), 0.0, "bpm {}", bpm);
        }
    }

    #[test]
    fn faster_tempo_approaches_later() {
        let config = StrikerConfig::STICK;
        let hit = hit_at(2.0);
        let slow = TempoMap::constant(480, Tempo::from_bpm(100.0)).unwrap();
        let fast = TempoMap::constant(480, Tempo::from_bpm(200.0)).unwrap();

        let mut a = StrikerState::new(&config);
        let mut b = StrikerState::new(&config);
        a.approach(&config, Some(&hit), 1.95, 0.01, &slow);
        b.approach(&config, Some(&hit), 1.95, 0.01, &fast);
        // Same time left, steeper slope: the fast striker is still higher up
        assert!(b.angle() > a.angle());
    }

    #[test]
    fn eases_back_after_strike() {
        let config = StrikerConfig::STICK;
        let mut s = StrikerState::new(&config);
        s.strike();
        s.approach(&config, None, 2.1, 0.1, &map());
        assert_abs_diff_eq!(s.angle(), config.return_rate * 0.1, epsilon = 1e-4);
        assert!(s.angle() < config.max_angle);

        for _ in 0..10 {
            s.approach(&config, None, 3.0, 0.1, &map());
        }
        assert_eq!(s.angle(), config.max_angle);
        assert!(!s.is_visible(&config));
    }

    #[test]
    fn snap_striker_ignores_upcoming() {
        let config = StrikerConfig::BEATER;
        let mut s = StrikerState::new(&config);
        s.approach(&config, Some(&hit_at(2.0)), 1.99, 0.01, &map());
        assert_eq!(s.angle(), config.max_angle);
        assert!(!s.is_approaching(&config, Some(&hit_at(2.0))));
    }

    #[test]
    fn tempo_before_governs_slope() {
        // Tempo doubles exactly at the hit: the slope still uses the old tempo
        let map = TempoMap::new(
            480,
            [
                sj_ir::TempoChange::new(0, DEFAULT_TEMPO),
                sj_ir::TempoChange::new(1920, Tempo::from_bpm(240.0)),
            ],
        )
        .unwrap();
        let hit = NoteEvent::new(60, 100, 1920, 2.0);
        let config = StrikerConfig::STICK;
        let mut s = StrikerState::new(&config);
        s.approach(&config, Some(&hit), 1.95, 0.01, &map);
        assert_abs_diff_eq!(s.angle(), 24.0, epsilon = 1e-3);
    }
}
