//! Pitch classification.

use core::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Keys a mallet instrument can play: the 88 keys of a piano, A0 to C8.
pub const MALLET_RANGE: PitchRange = PitchRange::new(21, 108);

/// Colour of the piano key a pitch falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyColor {
    /// White key (C D E F G A B)
    Natural,
    /// Black key (sharps and flats)
    Accidental,
}

/// Classify a MIDI pitch as natural or accidental.
pub const fn key_color(pitch: u8) -> KeyColor {
    match pitch % 12 {
        1 | 3 | 6 | 8 | 10 => KeyColor::Accidental,
        _ => KeyColor::Natural,
    }
}

/// Inclusive range of playable pitches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PitchRange {
    pub low: u8,
    pub high: u8,
}

impl PitchRange {
    pub const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub const fn contains(&self, pitch: u8) -> bool {
        pitch >= self.low && pitch <= self.high
    }

    /// Number of pitches in the range.
    pub const fn len(&self) -> usize {
        if self.high < self.low {
            0
        } else {
            (self.high - self.low) as usize + 1
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of `pitch` within the range, if playable.
    pub const fn index_of(&self, pitch: u8) -> Option<usize> {
        if self.contains(pitch) {
            Some((pitch - self.low) as usize)
        } else {
            None
        }
    }

    pub fn iter(&self) -> RangeInclusive<u8> {
        self.low..=self.high
    }
}
