//! Strike-animation engine for strikejam.
//!
//! Turns each voice's queue of note-ons into per-frame striker angles,
//! body recoil and pose choices, and hands the result to a scene sink.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod ensemble;
mod error;
mod instrument;
pub mod instruments;
mod layout;
mod pose;
mod recoil;
mod scene;
mod strike_queue;
mod striker;
mod voice;

pub use config::{
    velocity_dampening, Approach, Dampening, RecoilConfig, StrikerConfig, VoiceConfig, BEATER_RETURN_RATE,
    PEDAL_MAX_ANGLE, STICK_MAX_ANGLE, STICK_RETURN_RATE, STRIKE_SPEED, VELOCITY_DAMPENING_EXPONENT,
};
pub use ensemble::{Ensemble, InstrumentKey};
pub use error::{ConfigError, EngineError};
pub use instrument::{Instrument, InstrumentInfo};
pub use layout::{bar_layout, ensemble_offset, mallet_bars, BarLayout, BAR_SPACING, MALLET_CASE_SCALE, MALLET_STAGE_OFFSET};
pub use pose::{shadow_scale, Pose};
pub use recoil::{RecoilPhase, RecoilState, REST_EPSILON};
pub use scene::{Part, PartCounter, PartState, SceneSink};
pub use strike_queue::StrikeQueue;
pub use striker::{approach_angle, StrikerState};
pub use voice::{filter_pitches, partition_by_pitch, FrameClock, StrikeOutcome, Voice, VoiceFrame};
