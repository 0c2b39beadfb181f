//! Note events consumed by the animation engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A note-on resolved against the tempo map.
///
/// Immutable once produced by the timeline loader. `onset_seconds` is the
/// absolute time the note sounds; `onset_ticks` is kept so the tempo in
/// effect before the note can be looked up again per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoteEvent {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Strike velocity (0-127)
    pub velocity: u8,
    /// MIDI channel (0-15)
    pub channel: u8,
    /// Absolute tick from file start
    pub onset_ticks: u64,
    /// Absolute time in seconds from file start
    pub onset_seconds: f64,
}

impl NoteEvent {
    /// Create a new note event.
    pub fn new(pitch: u8, velocity: u8, onset_ticks: u64, onset_seconds: f64) -> Self {
        Self {
            pitch,
            velocity,
            channel: 0,
            onset_ticks,
            onset_seconds,
        }
    }

    /// Same event, tagged with a channel.
    pub fn on_channel(self, channel: u8) -> Self {
        Self { channel, ..self }
    }

    /// Whether this event has sounded by `time` (seconds).
    pub fn is_due(&self, time: f64) -> bool {
        self.onset_seconds <= time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_at_exact_onset() {
        let e = NoteEvent::new(60, 100, 480, 0.5);
        assert!(!e.is_due(0.49));
        assert!(e.is_due(0.5));
        assert!(e.is_due(0.6));
    }

    #[test]
    fn on_channel_keeps_timing() {
        let e = NoteEvent::new(36, 90, 960, 1.0).on_channel(9);
        assert_eq!(e.channel, 9);
        assert_eq!(e.onset_ticks, 960);
        assert_eq!(e.onset_seconds, 1.0);
    }
}
