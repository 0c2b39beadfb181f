//! Note timeline: every note-on of a file, grouped by channel and program.

use alloc::vec::Vec;

use crate::event::NoteEvent;
use crate::tempo::{TempoMap, TempoResolver};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// General MIDI percussion channel (channel 10, zero-based 9).
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Note-ons played on one channel while one program was selected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelTrack {
    pub channel: u8,
    pub program: u8,
    /// Sorted by onset.
    pub notes: Vec<NoteEvent>,
}

impl ChannelTrack {
    pub fn new(channel: u8, program: u8) -> Self {
        Self {
            channel,
            program,
            notes: Vec::new(),
        }
    }

    pub fn is_percussion(&self) -> bool {
        self.channel == PERCUSSION_CHANNEL
    }
}

/// Resolved note timeline plus the tempo map that placed it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timeline {
    pub tempo_map: TempoMap,
    pub tracks: Vec<ChannelTrack>,
}

impl Timeline {
    pub fn new(tempo_map: TempoMap) -> Self {
        Self {
            tempo_map,
            tracks: Vec::new(),
        }
    }

    /// Track for `(channel, program)`, created on first use.
    pub fn track_mut(&mut self, channel: u8, program: u8) -> &mut ChannelTrack {
        let index = match self
            .tracks
            .iter()
            .position(|t| t.channel == channel && t.program == program)
        {
            Some(index) => index,
            None => {
                self.tracks.push(ChannelTrack::new(channel, program));
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[index]
    }

    /// Add a note-on at `tick`, resolving its onset through the tempo map.
    pub fn push_note(&mut self, channel: u8, program: u8, pitch: u8, velocity: u8, tick: u64) {
        let seconds = self.tempo_map.seconds_at(tick);
        let note = NoteEvent::new(pitch, velocity, tick, seconds).on_channel(channel);
        self.track_mut(channel, program).notes.push(note);
    }

    /// Sort every track by onset, then tracks by channel and program.
    pub fn sort(&mut self) {
        for track in &mut self.tracks {
            track.notes.sort_by_key(|n| n.onset_ticks);
        }
        self.tracks.sort_by_key(|t| (t.channel, t.program));
    }

    pub fn note_count(&self) -> usize {
        self.tracks.iter().map(|t| t.notes.len()).sum()
    }

    /// Onset of the last note, in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.tracks
            .iter()
            .filter_map(|t| t.notes.last())
            .map(|n| n.onset_seconds)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tempo::DEFAULT_TEMPO;
    use approx::assert_abs_diff_eq;

    fn timeline() -> Timeline {
        Timeline::new(TempoMap::constant(480, DEFAULT_TEMPO).unwrap())
    }

    #[test]
    fn push_note_resolves_seconds() {
        let mut tl = timeline();
        tl.push_note(0, 12, 60, 100, 960);
        let note = tl.tracks[0].notes[0];
        assert_eq!(note.pitch, 60);
        assert_eq!(note.channel, 0);
        assert_abs_diff_eq!(note.onset_seconds, 1.0);
    }

    #[test]
    fn tracks_split_by_channel_and_program() {
        let mut tl = timeline();
        tl.push_note(0, 12, 60, 100, 0);
        tl.push_note(0, 13, 60, 100, 0);
        tl.push_note(9, 0, 36, 100, 0);
        tl.push_note(0, 12, 62, 100, 480);
        assert_eq!(tl.tracks.len(), 3);
        assert_eq!(tl.note_count(), 4);
        assert!(tl.tracks[2].is_percussion());
    }

    #[test]
    fn sort_orders_notes_and_tracks() {
        let mut tl = timeline();
        tl.push_note(9, 0, 36, 100, 960);
        tl.push_note(9, 0, 38, 100, 0);
        tl.push_note(1, 11, 60, 100, 0);
        tl.sort();
        assert_eq!(tl.tracks[0].channel, 1);
        assert_eq!(tl.tracks[1].notes[0].pitch, 38);
        assert_abs_diff_eq!(tl.duration_seconds(), 1.0);
    }
}
