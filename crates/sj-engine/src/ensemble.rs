//! Frame driver for every instrument on stage.

use alloc::boxed::Box;
use slotmap::SlotMap;
use sj_ir::TempoMap;
use tracing::debug;

use crate::error::EngineError;
use crate::instrument::Instrument;
use crate::scene::SceneSink;
use crate::voice::FrameClock;

slotmap::new_key_type! {
    /// Key for referencing instruments in an `Ensemble`.
    pub struct InstrumentKey;
}

/// Owns the tempo map and every instrument, and advances them in lockstep.
pub struct Ensemble {
    /// Tempo map shared by every approach calculation
    tempo_map: TempoMap,
    /// Instruments on stage
    instruments: SlotMap<InstrumentKey, Box<dyn Instrument>>,
    /// Playback time of the last accepted frame or seek, `None` before either
    time: Option<f64>,
    /// Frames accepted since the last seek
    frames: u64,
}

impl Ensemble {
    pub fn new(tempo_map: TempoMap) -> Self {
        Self {
            tempo_map,
            instruments: SlotMap::with_key(),
            time: None,
            frames: 0,
        }
    }

    pub fn tempo_map(&self) -> &TempoMap {
        &self.tempo_map
    }

    /// Put an instrument on stage.
    pub fn add(&mut self, instrument: Box<dyn Instrument>) -> InstrumentKey {
        debug!(
            "adding {} ({} voices, {} strikes)",
            instrument.info().name,
            instrument.voices().len(),
            instrument.pending()
        );
        self.instruments.insert(instrument)
    }

    pub fn remove(&mut self, key: InstrumentKey) -> Option<Box<dyn Instrument>> {
        self.instruments.remove(key)
    }

    pub fn get(&self, key: InstrumentKey) -> Option<&dyn Instrument> {
        self.instruments.get(key).map(|i| i.as_ref())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstrumentKey, &dyn Instrument)> {
        self.instruments.iter().map(|(k, i)| (k, i.as_ref()))
    }

    /// Playback time of the last accepted frame or seek.
    pub fn time(&self) -> Option<f64> {
        self.time
    }

    /// Frames advanced since construction or the last seek.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Strikes still waiting, across all instruments.
    pub fn pending(&self) -> usize {
        self.instruments.values().map(|i| i.pending()).sum()
    }

    /// Advance every instrument to playback time `time`.
    ///
    /// `time` must not precede the previous frame and `delta` must be finite
    /// and non-negative. The first frame may start anywhere, including
    /// before zero for a count-in. A rejected frame leaves every instrument
    /// untouched; call [`Ensemble::seek`] to jump backward.
    pub fn advance(&mut self, time: f64, delta: f32) -> Result<(), EngineError> {
        if !time.is_finite() {
            return Err(EngineError::InvalidTime(time));
        }
        if !(delta.is_finite() && delta >= 0.0) {
            return Err(EngineError::InvalidDelta(delta));
        }
        if let Some(previous) = self.time.filter(|&previous| time < previous) {
            return Err(EngineError::BackwardTime {
                previous,
                requested: time,
            });
        }

        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.tick_all(time, delta));
        #[cfg(not(feature = "alloc_check"))]
        self.tick_all(time, delta);

        Ok(())
    }

    fn tick_all(&mut self, time: f64, delta: f32) {
        let clock = FrameClock::new(time, delta);
        for instrument in self.instruments.values_mut() {
            instrument.tick(&clock, &self.tempo_map);
        }
        self.time = Some(time);
        self.frames += 1;
    }

    /// Jump to `time`, in either direction.
    ///
    /// Every voice re-seeds its queue to the first strike at or after
    /// `time` and returns to rest.
    pub fn seek(&mut self, time: f64) -> Result<(), EngineError> {
        if !time.is_finite() {
            return Err(EngineError::InvalidTime(time));
        }
        for instrument in self.instruments.values_mut() {
            instrument.seek(time);
        }
        self.time = Some(time);
        self.frames = 0;
        Ok(())
    }

    /// Describe the current frame of every instrument to `sink`.
    pub fn present(&self, sink: &mut dyn SceneSink) {
        for (key, instrument) in &self.instruments {
            instrument.present(key, sink);
        }
    }
}
