//! Engine error types.

use thiserror::Error;

/// A configuration value outside its valid domain.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("max angle must be positive and finite, got {0}")]
    MaxAngle(f32),
    #[error("strike speed must be positive and finite, got {0}")]
    StrikeSpeed(f32),
    #[error("return rate must be positive and finite, got {0}")]
    ReturnRate(f32),
    #[error("recoil travel must be non-zero and finite, got {0}")]
    Travel(f32),
    #[error("recoil comeback must be positive and finite, got {0}")]
    Comeback(f32),
}

/// A frame request that violates the clock contract.
///
/// The engine never recovers from these internally: the caller must
/// re-synchronize with `Ensemble::seek` before advancing again.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum EngineError {
    #[error("playback time moved backward from {previous}s to {requested}s; seek first")]
    BackwardTime { previous: f64, requested: f64 },
    #[error("playback time must be finite, got {0}")]
    InvalidTime(f64),
    #[error("frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),
}
