//! File loaders for strikejam.
//!
//! Parses Standard MIDI Files into the note timeline.

mod smf;

pub use smf::load_midi;

use thiserror::Error;

/// Error type for format parsing.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Malformed or truncated file
    #[error("invalid MIDI file: {0}")]
    Midi(#[from] midly::Error),
    /// SMPTE timecode division; only metrical (ticks per quarter) files are supported
    #[error("SMPTE timecode timing is not supported")]
    UnsupportedTiming,
    /// Tempo events that cannot form a tempo map
    #[error(transparent)]
    Tempo(#[from] sj_ir::TempoMapError),
}
