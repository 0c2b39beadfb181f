//! Voice: one independently animated striking unit.
//!
//! Every instrument family ticks the same `Voice`; only its `VoiceConfig`
//! and the events routed into its queue differ.

use alloc::vec::Vec;
use sj_ir::{NoteEvent, PitchRange, TempoResolver};

use crate::config::VoiceConfig;
use crate::pose::{shadow_scale, Pose};
use crate::recoil::{RecoilPhase, RecoilState};
use crate::strike_queue::StrikeQueue;
use crate::striker::StrikerState;

/// Playback time for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    /// Seconds from file start; non-decreasing between seeks.
    pub time: f64,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameClock {
    pub const fn new(time: f64, delta: f32) -> Self {
        Self { time, delta }
    }
}

/// What happened to a voice this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StrikeOutcome {
    /// The event that landed this frame, if any.
    pub struck: Option<NoteEvent>,
    /// The event the striker is committed to: the one that just landed, or
    /// the one it is descending toward.
    pub striking_for: Option<NoteEvent>,
}

/// Animation state of a voice, resolved for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceFrame {
    /// Degrees above the strike extreme.
    pub striker_angle: f32,
    pub striker_visible: bool,
    pub shadow_scale: f32,
    /// Normalized body displacement (0..=1).
    pub displacement: f32,
    /// Body offset in scene units along its recoil axis.
    pub body_offset: f32,
    pub phase: RecoilPhase,
    pub pose: Pose,
}

#[derive(Clone, Debug)]
pub struct Voice {
    config: VoiceConfig,
    queue: StrikeQueue,
    striker: StrikerState,
    recoil: RecoilState,
}

impl Voice {
    /// Create a voice at rest with its own queue of strikes.
    pub fn new(config: VoiceConfig, events: impl IntoIterator<Item = NoteEvent>) -> Self {
        Self {
            config,
            queue: StrikeQueue::from_events(events),
            striker: StrikerState::new(&config.striker),
            recoil: RecoilState::new(),
        }
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn queue(&self) -> &StrikeQueue {
        &self.queue
    }

    pub fn striker(&self) -> &StrikerState {
        &self.striker
    }

    pub fn recoil(&self) -> &RecoilState {
        &self.recoil
    }

    pub fn phase(&self) -> RecoilPhase {
        self.recoil.phase()
    }

    /// Advance one frame.
    ///
    /// Drains every event due by `clock.time`, keeping only the latest. A
    /// due event strikes immediately: striker at the extreme, body snapped
    /// to its struck displacement. Otherwise the body eases back and the
    /// striker approaches the next pending event.
    pub fn advance<R: TempoResolver + ?Sized>(&mut self, clock: &FrameClock, tempo: &R) -> StrikeOutcome {
        match self.queue.drain_due(clock.time) {
            Some(hit) => {
                self.striker.strike();
                self.recoil.strike(&self.config.recoil, hit.velocity);
                StrikeOutcome {
                    struck: Some(hit),
                    striking_for: Some(hit),
                }
            }
            None => {
                self.recoil.advance(&self.config.recoil, clock.delta);
                let upcoming = self.queue.peek();
                self.striker
                    .approach(&self.config.striker, upcoming, clock.time, clock.delta, tempo);
                let striking_for = if self.striker.is_approaching(&self.config.striker, upcoming) {
                    upcoming.copied()
                } else {
                    None
                };
                StrikeOutcome {
                    struck: None,
                    striking_for,
                }
            }
        }
    }

    /// Re-seed the queue at `time` and put the voice back at rest.
    pub fn seek(&mut self, time: f64) {
        self.queue.seek(time);
        self.striker.raise(&self.config.striker);
        self.recoil.rest();
    }

    pub fn frame(&self) -> VoiceFrame {
        let striker = &self.config.striker;
        let angle = self.striker.angle();
        VoiceFrame {
            striker_angle: angle,
            striker_visible: self.striker.is_visible(striker),
            shadow_scale: shadow_scale(angle, striker.max_angle),
            displacement: self.recoil.displacement(),
            body_offset: self.recoil.offset(&self.config.recoil),
            phase: self.recoil.phase(),
            pose: Pose::for_phase(self.recoil.phase()),
        }
    }
}

/// Route note events to one list per pitch in `range`.
///
/// Returns the per-pitch lists (indexed from `range.low`) and how many
/// events fell outside the range.
pub fn partition_by_pitch(notes: &[NoteEvent], range: PitchRange) -> (Vec<Vec<NoteEvent>>, usize) {
    let mut lanes: Vec<Vec<NoteEvent>> = (0..range.len()).map(|_| Vec::new()).collect();
    let mut dropped = 0;
    for note in notes {
        match range.index_of(note.pitch) {
            Some(i) => lanes[i].push(*note),
            None => dropped += 1,
        }
    }
    (lanes, dropped)
}

/// Keep only events whose pitch is in `pitches`.
pub fn filter_pitches(notes: &[NoteEvent], pitches: &[u8]) -> Vec<NoteEvent> {
    notes.iter().filter(|n| pitches.contains(&n.pitch)).copied().collect()
}
