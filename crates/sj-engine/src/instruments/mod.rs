//! Built-in instrument families.

mod bass_drum;
mod mallets;
mod ride_cymbal;
mod stick_drum;

pub use bass_drum::{BassDrum, BASS_DRUM_PITCHES};
pub use mallets::{MalletType, Mallets, BAR_COUNT};
pub use ride_cymbal::{RideCymbal, BELL_POSITION, EDGE_POSITION, RIDE_BELL, RIDE_PITCHES, STICK_MOVE_SPEED};
pub use stick_drum::{DrumKind, StickDrum};

use alloc::boxed::Box;
use sj_ir::NoteEvent;

use crate::instrument::Instrument;

/// Percussion-channel components of the kit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KitPiece {
    BassDrum,
    Stick(DrumKind),
    RideCymbal,
}

impl KitPiece {
    /// Whether any of `notes` would be played by this piece.
    pub fn plays(self, notes: &[NoteEvent]) -> bool {
        let pitches: &[u8] = match self {
            KitPiece::BassDrum => &BASS_DRUM_PITCHES,
            KitPiece::Stick(kind) => kind.pitches(),
            KitPiece::RideCymbal => &RIDE_PITCHES,
        };
        notes.iter().any(|n| pitches.contains(&n.pitch))
    }
}

/// Create the kit piece for the percussion channel's notes.
pub fn create_kit_piece(piece: KitPiece, notes: &[NoteEvent]) -> Box<dyn Instrument> {
    match piece {
        KitPiece::BassDrum => Box::new(BassDrum::new(notes)),
        KitPiece::Stick(kind) => Box::new(StickDrum::new(kind, notes)),
        KitPiece::RideCymbal => Box::new(RideCymbal::new(notes)),
    }
}

/// Create a mallet instrument for a melodic program.
///
/// Returns `None` for programs no mallet instrument plays.
pub fn create_mallets(program: u8, notes: &[NoteEvent], ensemble_index: usize) -> Option<Box<dyn Instrument>> {
    let kind = MalletType::from_program(program)?;
    Some(Box::new(Mallets::new(kind, notes, ensemble_index)))
}
