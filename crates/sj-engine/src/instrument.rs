//! Instrument trait for percussive instrument families.

use sj_ir::{TempoResolver, Transform};

use crate::ensemble::InstrumentKey;
use crate::scene::SceneSink;
use crate::voice::{FrameClock, Voice};

/// Static metadata about an instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstrumentInfo {
    pub name: &'static str,
    /// Primary model the renderer loads for this instrument.
    pub asset: &'static str,
    /// Texture applied over the model, where the family has its own.
    pub texture: Option<&'static str>,
}

/// Core trait for animated instruments.
///
/// An instrument owns its voices and its static placement. `tick` is the
/// only per-frame mutation; it must not allocate.
pub trait Instrument: Send {
    fn info(&self) -> &InstrumentInfo;

    /// Advance every voice one frame.
    fn tick(&mut self, clock: &FrameClock, tempo: &dyn TempoResolver);

    /// Re-seed every voice at `time` and return to rest.
    fn seek(&mut self, time: f64);

    fn voices(&self) -> &[Voice];

    /// Static placement within the scene.
    fn layout(&self) -> &Transform;

    /// Describe every animated part for the current frame.
    fn present(&self, key: InstrumentKey, sink: &mut dyn SceneSink);

    /// Events still waiting to strike, across all voices.
    fn pending(&self) -> usize {
        self.voices().iter().map(|v| v.queue().len()).sum()
    }
}
