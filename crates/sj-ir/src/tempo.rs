//! Tempo map: the tempo-relative clock.
//!
//! MIDI places events in ticks; how long a tick lasts depends on the tempo
//! in effect. `TempoMap` folds every tempo change into a table of absolute
//! seconds so that any tick resolves in `O(log n)` without allocating.

use alloc::vec;
use alloc::vec::Vec;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tempo assumed by MIDI until the first tempo meta event (120 BPM).
pub const DEFAULT_TEMPO: Tempo = Tempo::from_micros(500_000);

/// Tempo as microseconds per quarter note, the unit MIDI stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tempo {
    pub micros_per_quarter: u32,
}

impl Tempo {
    pub const fn from_micros(micros_per_quarter: u32) -> Self {
        Self { micros_per_quarter }
    }

    /// Tempo from beats per minute (rounded to the nearest microsecond).
    pub fn from_bpm(bpm: f64) -> Self {
        Self::from_micros((60_000_000.0 / bpm + 0.5) as u32)
    }

    /// Beats (quarter notes) per minute.
    pub fn bpm(self) -> f64 {
        60_000_000.0 / self.micros_per_quarter as f64
    }

    /// Length of one quarter note in seconds.
    pub fn seconds_per_quarter(self) -> f64 {
        self.micros_per_quarter as f64 / 1_000_000.0
    }
}

impl Default for Tempo {
    fn default() -> Self {
        DEFAULT_TEMPO
    }
}

/// A tempo meta event at an absolute tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TempoChange {
    pub tick: u64,
    pub tempo: Tempo,
}

impl TempoChange {
    pub const fn new(tick: u64, tempo: Tempo) -> Self {
        Self { tick, tempo }
    }
}

/// Error building a tempo map.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TempoMapError {
    #[error("ticks per quarter note must be non-zero")]
    ZeroResolution,
    #[error("tempo change at tick {tick} has zero microseconds per quarter note")]
    ZeroTempo { tick: u64 },
}

/// Resolves ticks against tempo changes.
///
/// The animation engine only ever asks two questions of the clock: when an
/// event sounds, and how fast the music is moving just before it.
pub trait TempoResolver {
    /// Absolute seconds of `tick`.
    fn seconds_at(&self, tick: u64) -> f64;

    /// Tempo governing the interval that ends at `tick`.
    ///
    /// A tempo change landing exactly on `tick` only affects what follows,
    /// so it is not the tempo "before" an event at that tick.
    fn tempo_before(&self, tick: u64) -> Tempo;
}

/// Tick-to-seconds table built from every tempo change in a file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TempoMap {
    ticks_per_quarter: u16,
    /// Sorted by tick; the first entry is always at tick 0.
    changes: Vec<TempoChange>,
    /// Absolute seconds at each entry of `changes`.
    seconds: Vec<f64>,
}

impl TempoMap {
    /// Build a map from tempo changes in any order.
    ///
    /// Changes sharing a tick keep the last one given. If nothing sets the
    /// tempo at tick 0, [`DEFAULT_TEMPO`] applies until the first change.
    pub fn new(
        ticks_per_quarter: u16,
        changes: impl IntoIterator<Item = TempoChange>,
    ) -> Result<Self, TempoMapError> {
        if ticks_per_quarter == 0 {
            return Err(TempoMapError::ZeroResolution);
        }

        let mut sorted: Vec<TempoChange> = changes.into_iter().collect();
        if let Some(bad) = sorted.iter().find(|c| c.tempo.micros_per_quarter == 0) {
            return Err(TempoMapError::ZeroTempo { tick: bad.tick });
        }
        // Stable sort keeps file order within a tick, so the later event wins below
        sorted.sort_by_key(|c| c.tick);

        let mut merged: Vec<TempoChange> = Vec::with_capacity(sorted.len() + 1);
        for change in sorted {
            match merged.last_mut() {
                Some(last) if last.tick == change.tick => *last = change,
                _ => merged.push(change),
            }
        }
        if !merged.first().is_some_and(|c| c.tick == 0) {
            merged.insert(0, TempoChange::new(0, DEFAULT_TEMPO));
        }

        let mut seconds = Vec::with_capacity(merged.len());
        let mut elapsed = 0.0;
        for (i, change) in merged.iter().enumerate() {
            if i > 0 {
                let prev = merged[i - 1];
                elapsed += ticks_to_seconds(change.tick - prev.tick, prev.tempo, ticks_per_quarter);
            }
            seconds.push(elapsed);
        }

        Ok(Self {
            ticks_per_quarter,
            changes: merged,
            seconds,
        })
    }

    /// A map with a single tempo for the whole file.
    pub fn constant(ticks_per_quarter: u16, tempo: Tempo) -> Result<Self, TempoMapError> {
        Self::new(ticks_per_quarter, [TempoChange::new(0, tempo)])
    }

    pub fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    /// Tempo changes in tick order, starting at tick 0.
    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// Tempo in effect at `tick` (a change at `tick` counts).
    pub fn tempo_at(&self, tick: u64) -> Tempo {
        self.changes[self.segment(tick)].tempo
    }

    /// Index of the change governing `tick`.
    fn segment(&self, tick: u64) -> usize {
        // changes[0].tick == 0, so partition_point is at least 1
        self.changes.partition_point(|c| c.tick <= tick) - 1
    }
}

/// Resolution used when a timeline has no file behind it.
pub const DEFAULT_TICKS_PER_QUARTER: u16 = 480;

impl Default for TempoMap {
    /// 480 ticks per quarter at [`DEFAULT_TEMPO`] throughout.
    fn default() -> Self {
        Self {
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            changes: vec![TempoChange::new(0, DEFAULT_TEMPO)],
            seconds: vec![0.0],
        }
    }
}

impl TempoResolver for TempoMap {
    fn seconds_at(&self, tick: u64) -> f64 {
        let i = self.segment(tick);
        let change = self.changes[i];
        self.seconds[i] + ticks_to_seconds(tick - change.tick, change.tempo, self.ticks_per_quarter)
    }

    fn tempo_before(&self, tick: u64) -> Tempo {
        self.tempo_at(tick.saturating_sub(1))
    }
}

fn ticks_to_seconds(ticks: u64, tempo: Tempo, ticks_per_quarter: u16) -> f64 {
    ticks as f64 * tempo.seconds_per_quarter() / ticks_per_quarter as f64
}
