//! Core IR types for strikejam.
//!
//! This crate defines the data shared between the timeline loader, the
//! strike-animation engine and whatever renders the result: note events,
//! the tempo map that places them in seconds, pitch classification and
//! plain scene transforms.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod event;
mod pitch;
mod scene;
mod tempo;
mod timeline;

pub use event::NoteEvent;
pub use pitch::{key_color, KeyColor, PitchRange, MALLET_RANGE};
pub use scene::{Transform, Vec3};
pub use tempo::{Tempo, TempoChange, TempoMap, TempoMapError, TempoResolver, DEFAULT_TEMPO, DEFAULT_TICKS_PER_QUARTER};
pub use timeline::{ChannelTrack, Timeline, PERCUSSION_CHANNEL};
