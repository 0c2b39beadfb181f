//! Headless controller for strikejam.
//!
//! Provides a unified API for loading MIDI files, assigning instruments,
//! offline rendering and real-time playback that a renderer or the CLI can
//! share.

mod assignment;

use sj_engine::{Ensemble, PartCounter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{info, warn};

// Re-export common types so callers don't need sj-ir/sj-engine directly.
pub use assignment::{assign, build_ensemble, Assignment, MalletPart, KIT_PIECES};
pub use sj_engine::{EngineError, SceneSink};
pub use sj_formats::FormatError;
pub use sj_ir::Timeline;

/// Summary of an offline run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderReport {
    /// Frames advanced.
    pub frames: u64,
    /// Playback time of the last frame.
    pub seconds: f64,
    /// Note events consumed, including ones collapsed into a single strike.
    pub events: usize,
    /// Most strikers, shadows and bodies visible in one frame.
    pub peak_visible: usize,
    /// Most bodies shown in their struck pose in one frame.
    pub peak_down: usize,
}

/// Headless controller: owns a timeline and drives ensembles built from it.
pub struct Controller {
    timeline: Timeline,
    assignment: Assignment,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    stop_signal: Arc<AtomicBool>,
    /// Playback time in seconds, stored as `f64` bits.
    current_time: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_timeline(Timeline::new(sj_ir::TempoMap::default()))
    }

    pub fn with_timeline(timeline: Timeline) -> Self {
        let assignment = assign(&timeline);
        Self {
            timeline,
            assignment,
            playback: None,
        }
    }

    // --- Timeline management ---

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn load_midi(&mut self, data: &[u8]) -> Result<(), FormatError> {
        self.stop();
        let timeline = sj_formats::load_midi(data)?;
        info!(
            "loaded {} notes on {} tracks, {:.1}s",
            timeline.note_count(),
            timeline.tracks.len(),
            timeline.duration_seconds()
        );
        self.assignment = assign(&timeline);
        self.timeline = timeline;
        Ok(())
    }

    /// A fresh ensemble at rest at the start of the timeline.
    pub fn ensemble(&self) -> Ensemble {
        build_ensemble(&self.timeline, &self.assignment)
    }

    // --- Real-time playback ---

    /// Start playing from `start` seconds at `fps` frames per second on a
    /// background thread, paced by the wall clock.
    pub fn play(&mut self, start: f64, fps: u32) -> Result<(), EngineError> {
        self.stop();

        let mut ensemble = self.ensemble();
        ensemble.seek(start)?;
        let end = self.timeline.duration_seconds() + TAIL_SECONDS;

        let stop_signal = Arc::new(AtomicBool::new(false));
        let current_time = Arc::new(AtomicU64::new(start.to_bits()));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let time = current_time.clone();
        let done = finished.clone();

        let thread = std::thread::spawn(move || {
            playback_thread(ensemble, start, end, fps.max(1), stop, time, done);
        });

        self.playback = Some(PlaybackHandle {
            stop_signal,
            current_time,
            finished,
            thread: Some(thread),
        });
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Playback time of the last frame, while playing.
    pub fn position(&self) -> Option<f64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) {
            return None;
        }
        Some(f64::from_bits(pb.current_time.load(Ordering::Relaxed)))
    }

    // --- Offline rendering ---

    /// Run every frame from the start as fast as possible.
    pub fn render_frames(&self, fps: u32, max_seconds: f64) -> Result<RenderReport, EngineError> {
        self.render_from(0.0, fps, max_seconds)
    }

    /// Run frames from `start` until the last strike has settled or
    /// `max_seconds` of playback have elapsed.
    pub fn render_from(&self, start: f64, fps: u32, max_seconds: f64) -> Result<RenderReport, EngineError> {
        self.render_with(start, fps, max_seconds, &mut NullSink)
    }

    /// Same as [`Controller::render_from`], describing every frame to `sink`.
    pub fn render_with(
        &self,
        start: f64,
        fps: u32,
        max_seconds: f64,
        sink: &mut dyn SceneSink,
    ) -> Result<RenderReport, EngineError> {
        let mut ensemble = self.ensemble();
        ensemble.seek(start)?;

        let fps = fps.max(1) as f64;
        let delta = 1.0 / fps;
        let end = (self.timeline.duration_seconds() + TAIL_SECONDS).min(start + max_seconds);
        let total = ensemble.pending();

        let mut report = RenderReport::default();
        let mut frame = 0u64;
        loop {
            frame += 1;
            let time = start + frame as f64 / fps;
            if time > end {
                break;
            }
            ensemble.advance(time, delta as f32)?;

            let mut counter = PartCounter::default();
            ensemble.present(&mut counter);
            ensemble.present(sink);

            report.frames = frame;
            report.seconds = time;
            report.peak_visible = report.peak_visible.max(counter.visible);
            report.peak_down = report.peak_down.max(counter.down);
        }
        report.events = total - ensemble.pending();
        Ok(report)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Playback continues this long past the last onset so strikes settle.
const TAIL_SECONDS: f64 = 1.0;

/// Sink that ignores everything.
struct NullSink;

impl SceneSink for NullSink {
    fn part(&mut self, _key: sj_engine::InstrumentKey, _state: &sj_engine::PartState) {}
}

fn playback_thread(
    mut ensemble: Ensemble,
    start: f64,
    end: f64,
    fps: u32,
    stop_signal: Arc<AtomicBool>,
    current_time: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
) {
    let frame_interval = Duration::from_secs_f64(1.0 / fps as f64);
    let clock = Instant::now();
    let mut previous = start;

    while !stop_signal.load(Ordering::Relaxed) {
        let time = start + clock.elapsed().as_secs_f64();
        if let Err(e) = ensemble.advance(time, (time - previous) as f32) {
            warn!("playback stopped: {}", e);
            break;
        }
        previous = time;

        let mut counter = PartCounter::default();
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| ensemble.present(&mut counter));
        #[cfg(not(feature = "alloc_check"))]
        ensemble.present(&mut counter);

        current_time.store(time.to_bits(), Ordering::Relaxed);
        if time >= end {
            break;
        }
        std::thread::sleep(frame_interval);
    }

    finished.store(true, Ordering::Relaxed);
}
