//! Per-voice queue of pending strikes.

use alloc::vec::Vec;
use sj_ir::NoteEvent;

/// A voice's note-ons, ordered by onset.
///
/// During playback, events are consumed via a cursor that advances forward
/// without removing elements, making the per-frame drain allocation-free.
/// Everything before the cursor has sounded; everything from the cursor on
/// is pending.
#[derive(Clone, Debug, Default)]
pub struct StrikeQueue {
    events: Vec<NoteEvent>,
    /// Index of the next pending event.
    cursor: usize,
}

impl StrikeQueue {
    /// Create a new empty queue.
    pub fn new() -> Self {
        Self { events: Vec::new(), cursor: 0 }
    }

    /// Build a queue from events in any order.
    ///
    /// Sorting is stable, so events sharing an onset keep their input order.
    pub fn from_events(events: impl IntoIterator<Item = NoteEvent>) -> Self {
        let mut events: Vec<NoteEvent> = events.into_iter().collect();
        events.sort_by(|a, b| a.onset_seconds.total_cmp(&b.onset_seconds));
        Self { events, cursor: 0 }
    }

    /// Insert an event in onset order (setup phase only).
    pub fn push(&mut self, event: NoteEvent) {
        let pos = self
            .events
            .partition_point(|e| e.onset_seconds <= event.onset_seconds);
        self.events.insert(pos, event);
    }

    /// Consume every event due at `time`, returning only the latest.
    ///
    /// Several onsets landing inside one frame collapse into a single
    /// strike; the earlier ones are skipped without being animated.
    pub fn drain_due(&mut self, time: f64) -> Option<NoteEvent> {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].is_due(time) {
            self.cursor += 1;
        }
        if self.cursor > start {
            Some(self.events[self.cursor - 1])
        } else {
            None
        }
    }

    /// Next pending event.
    pub fn peek(&self) -> Option<&NoteEvent> {
        self.events.get(self.cursor)
    }

    /// Most recently consumed event.
    pub fn prev(&self) -> Option<&NoteEvent> {
        self.cursor.checked_sub(1).and_then(|i| self.events.get(i))
    }

    /// Move the cursor so the next pending event is the first with onset at
    /// or after `time`.
    ///
    /// This is the only way to go back in time; `drain_due` never does.
    pub fn seek(&mut self, time: f64) {
        self.cursor = self.events.partition_point(|e| e.onset_seconds < time);
    }

    /// Reset cursor to the beginning.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Clear all events and reset cursor.
    pub fn clear(&mut self) {
        self.events.clear();
        self.cursor = 0;
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len() - self.cursor
    }

    /// Returns true if no event is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of events including those already consumed.
    pub fn total(&self) -> usize {
        self.events.len()
    }

    /// Every event, consumed or not, in onset order.
    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }
}
