//! Mallet percussion: vibraphone, glockenspiel, marimba, xylophone.
//!
//! 88 bars, one voice each. A mallet hangs over every bar, descends on the
//! tempo-driven approach line and casts a shadow that grows as it nears the
//! bar; the struck bar swaps to its pressed-down model while it recoils.

use arrayvec::ArrayVec;
use sj_ir::{NoteEvent, TempoResolver, Transform, Vec3, MALLET_RANGE};
use tracing::debug;

use crate::config::VoiceConfig;
use crate::ensemble::InstrumentKey;
use crate::error::ConfigError;
use crate::instrument::{Instrument, InstrumentInfo};
use crate::layout::{ensemble_offset, mallet_bars, BarLayout, MALLET_CASE_SCALE};
use crate::pose::Pose;
use crate::scene::{Part, PartState, SceneSink};
use crate::voice::{partition_by_pitch, FrameClock, Voice};

/// Number of bars, one per key in [`MALLET_RANGE`].
pub const BAR_COUNT: usize = 88;

/// Which mallet instrument is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MalletType {
    Vibraphone,
    Marimba,
    Glockenspiel,
    Xylophone,
}

impl MalletType {
    /// General MIDI program (zero-based) to mallet type.
    pub fn from_program(program: u8) -> Option<Self> {
        match program {
            9 => Some(MalletType::Glockenspiel),
            11 => Some(MalletType::Vibraphone),
            12 => Some(MalletType::Marimba),
            13 => Some(MalletType::Xylophone),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MalletType::Vibraphone => "Vibraphone",
            MalletType::Marimba => "Marimba",
            MalletType::Glockenspiel => "Glockenspiel",
            MalletType::Xylophone => "Xylophone",
        }
    }

    /// Texture applied to bars and mallets.
    pub fn texture(self) -> &'static str {
        match self {
            MalletType::Vibraphone => "VibesBar.bmp",
            MalletType::Marimba => "MarimbaBar.bmp",
            MalletType::Glockenspiel => "GlockenspielBar.bmp",
            MalletType::Xylophone => "XylophoneBar.bmp",
        }
    }
}

pub struct Mallets {
    kind: MalletType,
    info: InstrumentInfo,
    voices: ArrayVec<Voice, BAR_COUNT>,
    bars: ArrayVec<BarLayout, BAR_COUNT>,
    layout: Transform,
}

impl Mallets {
    /// Build a mallet instrument from a channel's notes.
    ///
    /// `ensemble_index` is this instrument's position among the mallet
    /// instruments sharing the stage. Notes outside [`MALLET_RANGE`] are
    /// dropped.
    pub fn new(kind: MalletType, notes: &[NoteEvent], ensemble_index: usize) -> Self {
        Self::build(kind, notes, ensemble_index, VoiceConfig::MALLET_BAR)
    }

    /// Same as [`Mallets::new`] with custom tuning for every bar.
    pub fn with_config(
        kind: MalletType,
        notes: &[NoteEvent],
        ensemble_index: usize,
        config: VoiceConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(kind, notes, ensemble_index, config))
    }

    fn build(kind: MalletType, notes: &[NoteEvent], ensemble_index: usize, config: VoiceConfig) -> Self {
        let (lanes, dropped) = partition_by_pitch(notes, MALLET_RANGE);
        if dropped > 0 {
            debug!("{}: dropped {} notes outside {}..={}", kind.name(), dropped, MALLET_RANGE.low, MALLET_RANGE.high);
        }

        let voices = lanes.into_iter().map(|lane| Voice::new(config, lane)).collect();
        let bars = mallet_bars().collect();

        Self {
            kind,
            info: InstrumentInfo {
                name: kind.name(),
                asset: "XylophoneCase.obj",
                texture: Some(kind.texture()),
            },
            voices,
            bars,
            layout: ensemble_offset(ensemble_index),
        }
    }

    pub fn kind(&self) -> MalletType {
        self.kind
    }

    pub fn bars(&self) -> &[BarLayout] {
        &self.bars
    }

    /// Voice for the bar playing `pitch`.
    pub fn voice_for(&self, pitch: u8) -> Option<&Voice> {
        MALLET_RANGE.index_of(pitch).and_then(|i| self.voices.get(i))
    }
}

impl Instrument for Mallets {
    fn info(&self) -> &InstrumentInfo {
        &self.info
    }

    fn tick(&mut self, clock: &FrameClock, tempo: &dyn TempoResolver) {
        for voice in &mut self.voices {
            voice.advance(clock, tempo);
        }
    }

    fn seek(&mut self, time: f64) {
        for voice in &mut self.voices {
            voice.seek(time);
        }
    }

    fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn layout(&self) -> &Transform {
        &self.layout
    }

    fn present(&self, key: InstrumentKey, sink: &mut dyn SceneSink) {
        sink.instrument(key, &self.info, &self.layout);
        for (i, (voice, bar)) in self.voices.iter().zip(&self.bars).enumerate() {
            let frame = voice.frame();

            sink.part(
                key,
                &PartState {
                    voice: i,
                    part: Part::Striker,
                    transform: Transform::from_translation(bar.position + bar.mallet)
                        .with_rotation(Vec3::new(frame.striker_angle, 0.0, 0.0))
                        .with_scale(Vec3::splat(MALLET_CASE_SCALE)),
                    visible: frame.striker_visible,
                    pose: Pose::Up,
                },
            );
            sink.part(
                key,
                &PartState {
                    voice: i,
                    part: Part::Shadow,
                    transform: Transform::from_translation(bar.position + bar.shadow)
                        .with_scale(Vec3::splat(frame.shadow_scale)),
                    visible: frame.shadow_scale > 0.0,
                    pose: Pose::Up,
                },
            );
            sink.part(
                key,
                &PartState {
                    voice: i,
                    part: Part::Body,
                    transform: Transform::from_translation(bar.position + Vec3::new(0.0, frame.body_offset, 0.0))
                        .with_scale(bar.bar_scale),
                    visible: true,
                    pose: frame.pose,
                },
            );
        }
    }
}
