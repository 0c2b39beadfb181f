//! Per-frame scene data handed to the renderer.
//!
//! The engine never touches scene nodes. Each frame, instruments describe
//! every animated part as a `PartState` and push it into a `SceneSink`; the
//! renderer maps `(instrument, voice, part)` onto its own nodes.

use sj_ir::Transform;

use crate::ensemble::InstrumentKey;
use crate::instrument::InstrumentInfo;
use crate::pose::Pose;

/// An animated component of a voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Part {
    /// Stick, mallet or beater arm.
    Striker,
    /// Shadow cast under a striker.
    Shadow,
    /// The struck body: bar, shell or cymbal.
    Body,
    /// Bass drum pedal.
    Pedal,
}

/// Resolved state of one part for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartState {
    /// Voice index within the instrument.
    pub voice: usize,
    pub part: Part,
    /// Local transform relative to the voice's static placement.
    pub transform: Transform,
    pub visible: bool,
    /// Model to show for two-pose bodies; `Up` for everything else.
    pub pose: Pose,
}

/// Receiver for per-frame scene data.
pub trait SceneSink {
    /// Called once per instrument before its parts.
    fn instrument(&mut self, _key: InstrumentKey, _info: &InstrumentInfo, _layout: &Transform) {}

    fn part(&mut self, key: InstrumentKey, state: &PartState);
}

/// Sink that only counts what it receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartCounter {
    pub instruments: usize,
    pub parts: usize,
    pub visible: usize,
    pub down: usize,
}

impl SceneSink for PartCounter {
    fn instrument(&mut self, _key: InstrumentKey, _info: &InstrumentInfo, _layout: &Transform) {
        self.instruments += 1;
    }

    fn part(&mut self, _key: InstrumentKey, state: &PartState) {
        self.parts += 1;
        if state.visible {
            self.visible += 1;
        }
        if state.pose.is_down() {
            self.down += 1;
        }
    }
}
