//! Per-voice tuning.
//!
//! Every instrument family runs the same engine; what differs is the
//! constants below. The presets carry the tuned values the instruments use.

use core::f32::consts::PI;

use sj_ir::Tempo;

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const RAD_TO_DEG: f32 = 180.0 / PI;

/// Raised angle of sticks and mallets, in degrees.
pub const STICK_MAX_ANGLE: f32 = 50.0;

/// Multiplier on beats per minute giving the approach slope in degrees per second.
pub const STRIKE_SPEED: f32 = 4.0;

/// Stick and mallet return rate after a strike: 5 rad/s.
pub const STICK_RETURN_RATE: f32 = 5.0 * RAD_TO_DEG;

/// Bass drum beater return rate: 8 rad/s.
pub const BEATER_RETURN_RATE: f32 = 8.0 * RAD_TO_DEG;

/// Raised angle of the bass drum pedal, in degrees.
pub const PEDAL_MAX_ANGLE: f32 = 20.0;

/// Exponent of the velocity curve; below 1 so soft hits still move visibly.
pub const VELOCITY_DAMPENING_EXPONENT: f32 = 0.5;

/// How a striker reaches its strike extreme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Approach {
    /// Descends along a tempo-scaled slope so it lands exactly at onset.
    TempoDriven,
    /// Stays raised until the onset frame, then snaps down (beaters, pedals).
    Snap,
}

/// Tuning for a rotating striker (stick, mallet, beater, pedal).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrikerConfig {
    /// Fully raised angle in degrees; 0 is the strike extreme.
    pub max_angle: f32,
    /// Approach slope in degrees per second per BPM.
    pub strike_speed: f32,
    /// Ease-back rate toward `max_angle`, degrees per second.
    pub return_rate: f32,
    pub approach: Approach,
}

impl StrikerConfig {
    /// Drum stick.
    pub const STICK: StrikerConfig = StrikerConfig {
        max_angle: STICK_MAX_ANGLE,
        strike_speed: STRIKE_SPEED,
        return_rate: STICK_RETURN_RATE,
        approach: Approach::TempoDriven,
    };

    /// Mallet above a bar.
    pub const MALLET: StrikerConfig = StrikerConfig::STICK;

    /// Bass drum beater arm.
    pub const BEATER: StrikerConfig = StrikerConfig {
        max_angle: STICK_MAX_ANGLE,
        strike_speed: STRIKE_SPEED,
        return_rate: BEATER_RETURN_RATE,
        approach: Approach::Snap,
    };

    /// Bass drum pedal; returns in step with the beater.
    pub const PEDAL: StrikerConfig = StrikerConfig {
        max_angle: PEDAL_MAX_ANGLE,
        strike_speed: STRIKE_SPEED,
        return_rate: BEATER_RETURN_RATE * (PEDAL_MAX_ANGLE / STICK_MAX_ANGLE),
        approach: Approach::Snap,
    };

    /// Approach slope at `tempo`, in degrees per second.
    ///
    /// Scales with beats per minute, so a faster tempo descends faster and
    /// the landing time never depends on tempo.
    pub fn approach_slope(&self, tempo: Tempo) -> f64 {
        tempo.bpm() * self.strike_speed as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_angle.is_finite() && self.max_angle > 0.0) {
            return Err(ConfigError::MaxAngle(self.max_angle));
        }
        if !(self.strike_speed.is_finite() && self.strike_speed > 0.0) {
            return Err(ConfigError::StrikeSpeed(self.strike_speed));
        }
        if !(self.return_rate.is_finite() && self.return_rate > 0.0) {
            return Err(ConfigError::ReturnRate(self.return_rate));
        }
        Ok(())
    }
}

/// How strike velocity scales recoil displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dampening {
    /// Every strike travels the full distance.
    Full,
    /// Displacement follows [`velocity_dampening`].
    Velocity,
}

impl Dampening {
    /// Normalized displacement (0..=1) for a strike at `velocity`.
    pub fn apply(self, velocity: u8) -> f32 {
        match self {
            Dampening::Full => 1.0,
            Dampening::Velocity => velocity_dampening(velocity),
        }
    }
}

/// Monotonic, sub-linear map from MIDI velocity to normalized displacement.
///
/// 0 maps to 0 and 127 to 1; values above 127 saturate.
pub fn velocity_dampening(velocity: u8) -> f32 {
    let v = velocity.min(127) as f32 / 127.0;
    libm::powf(v, VELOCITY_DAMPENING_EXPONENT)
}

/// Tuning for a body that recoils when struck (bar, shell, cymbal).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecoilConfig {
    /// Offset at full displacement, in scene units (or degrees for tilts).
    /// The sign gives the direction.
    pub travel: f32,
    /// Return speed toward rest, in the same units per second.
    pub comeback: f32,
    pub dampening: Dampening,
}

impl RecoilConfig {
    /// Mallet bar: pressed down half a unit regardless of velocity.
    pub const MALLET_BAR: RecoilConfig = RecoilConfig {
        travel: -0.5,
        comeback: 5.0,
        dampening: Dampening::Full,
    };

    /// Bass drum shell, pushed back along Z.
    pub const BASS_DRUM: RecoilConfig = RecoilConfig {
        travel: -3.0,
        comeback: 22.0,
        dampening: Dampening::Velocity,
    };

    /// Snare and tom shells, pushed down along Y.
    pub const STICK_DRUM: RecoilConfig = RecoilConfig {
        travel: -2.0,
        comeback: 22.0,
        dampening: Dampening::Velocity,
    };

    /// Cymbal tilt about X, in degrees.
    pub const CYMBAL: RecoilConfig = RecoilConfig {
        travel: 8.0,
        comeback: 40.0,
        dampening: Dampening::Velocity,
    };

    /// Normalized displacement recovered per second.
    pub fn return_rate(&self) -> f32 {
        self.comeback / libm::fabsf(self.travel)
    }

    /// Scene offset for a normalized displacement.
    pub fn offset(&self, displacement: f32) -> f32 {
        self.travel * displacement
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.travel.is_finite() && self.travel != 0.0) {
            return Err(ConfigError::Travel(self.travel));
        }
        if !(self.comeback.is_finite() && self.comeback > 0.0) {
            return Err(ConfigError::Comeback(self.comeback));
        }
        Ok(())
    }
}

/// Full tuning for one voice: its striker and the body it strikes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoiceConfig {
    pub striker: StrikerConfig,
    pub recoil: RecoilConfig,
}

impl VoiceConfig {
    pub const MALLET_BAR: VoiceConfig = VoiceConfig {
        striker: StrikerConfig::MALLET,
        recoil: RecoilConfig::MALLET_BAR,
    };

    pub const BASS_DRUM: VoiceConfig = VoiceConfig {
        striker: StrikerConfig::BEATER,
        recoil: RecoilConfig::BASS_DRUM,
    };

    pub const STICK_DRUM: VoiceConfig = VoiceConfig {
        striker: StrikerConfig::STICK,
        recoil: RecoilConfig::STICK_DRUM,
    };

    pub const CYMBAL: VoiceConfig = VoiceConfig {
        striker: StrikerConfig::STICK,
        recoil: RecoilConfig::CYMBAL,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.striker.validate()?;
        self.recoil.validate()
    }
}
