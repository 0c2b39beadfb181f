//! Snare and toms: one stick on the tempo-driven approach line, one shell
//! pushed down on every hit.

use sj_ir::{NoteEvent, TempoResolver, Transform, Vec3};

use crate::config::VoiceConfig;
use crate::ensemble::InstrumentKey;
use crate::error::ConfigError;
use crate::instrument::{Instrument, InstrumentInfo};
use crate::pose::Pose;
use crate::scene::{Part, PartState, SceneSink};
use crate::voice::{filter_pitches, FrameClock, Voice};

/// Stick pivot relative to the drum.
const STICK_POSITION: Vec3 = Vec3::new(0.0, 2.0, 10.0);

/// Which shell of the kit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrumKind {
    Snare,
    LowFloorTom,
    HighFloorTom,
    LowTom,
    LowMidTom,
    HighMidTom,
    HighTom,
}

impl DrumKind {
    pub const ALL: [DrumKind; 7] = [
        DrumKind::Snare,
        DrumKind::LowFloorTom,
        DrumKind::HighFloorTom,
        DrumKind::LowTom,
        DrumKind::LowMidTom,
        DrumKind::HighMidTom,
        DrumKind::HighTom,
    ];

    /// Percussion-channel pitches this drum answers to.
    pub fn pitches(self) -> &'static [u8] {
        match self {
            DrumKind::Snare => &[38, 40],
            DrumKind::LowFloorTom => &[41],
            DrumKind::HighFloorTom => &[43],
            DrumKind::LowTom => &[45],
            DrumKind::LowMidTom => &[47],
            DrumKind::HighMidTom => &[48],
            DrumKind::HighTom => &[50],
        }
    }

    pub fn info(self) -> &'static InstrumentInfo {
        const SNARE: InstrumentInfo = InstrumentInfo {
            name: "Snare Drum",
            asset: "DrumSet_SnareDrum.obj",
            texture: None,
        };
        const LOW_FLOOR: InstrumentInfo = InstrumentInfo {
            name: "Low Floor Tom",
            asset: "DrumSet_Tom.obj",
            texture: None,
        };
        const HIGH_FLOOR: InstrumentInfo = InstrumentInfo {
            name: "High Floor Tom",
            asset: "DrumSet_Tom.obj",
            texture: None,
        };
        const LOW: InstrumentInfo = InstrumentInfo {
            name: "Low Tom",
            asset: "DrumSet_Tom.obj",
            texture: None,
        };
        const LOW_MID: InstrumentInfo = InstrumentInfo {
            name: "Low-Mid Tom",
            asset: "DrumSet_Tom.obj",
            texture: None,
        };
        const HIGH_MID: InstrumentInfo = InstrumentInfo {
            name: "High-Mid Tom",
            asset: "DrumSet_Tom.obj",
            texture: None,
        };
        const HIGH: InstrumentInfo = InstrumentInfo {
            name: "High Tom",
            asset: "DrumSet_Tom.obj",
            texture: None,
        };
        match self {
            DrumKind::Snare => &SNARE,
            DrumKind::LowFloorTom => &LOW_FLOOR,
            DrumKind::HighFloorTom => &HIGH_FLOOR,
            DrumKind::LowTom => &LOW,
            DrumKind::LowMidTom => &LOW_MID,
            DrumKind::HighMidTom => &HIGH_MID,
            DrumKind::HighTom => &HIGH,
        }
    }

    /// Placement around the kit, facing the player.
    pub fn layout(self) -> Transform {
        let (position, rotation, scale) = match self {
            DrumKind::Snare => (Vec3::new(-10.9, 16.0, -72.5), Vec3::new(10.0, 0.0, -10.0), 1.0),
            DrumKind::LowFloorTom => (Vec3::new(20.0, 10.0, -65.0), Vec3::new(0.0, 45.0, 0.0), 1.5),
            DrumKind::HighFloorTom => (Vec3::new(17.0, 14.0, -75.0), Vec3::new(0.0, 45.0, 0.0), 1.4),
            DrumKind::LowTom => (Vec3::new(10.0, 20.0, -82.0), Vec3::new(20.0, 20.0, 0.0), 1.2),
            DrumKind::LowMidTom => (Vec3::new(4.0, 22.0, -85.0), Vec3::new(25.0, 10.0, 0.0), 1.1),
            DrumKind::HighMidTom => (Vec3::new(-4.0, 22.0, -85.0), Vec3::new(25.0, -10.0, 0.0), 1.0),
            DrumKind::HighTom => (Vec3::new(-11.0, 20.0, -80.0), Vec3::new(20.0, -20.0, 0.0), 0.9),
        };
        Transform::from_translation(position)
            .with_rotation(rotation)
            .with_scale(Vec3::splat(scale))
    }
}

pub struct StickDrum {
    kind: DrumKind,
    voices: [Voice; 1],
    layout: Transform,
}

impl StickDrum {
    /// Build from the percussion channel's notes; other pitches are ignored.
    pub fn new(kind: DrumKind, notes: &[NoteEvent]) -> Self {
        Self::build(kind, notes, VoiceConfig::STICK_DRUM)
    }

    pub fn with_config(kind: DrumKind, notes: &[NoteEvent], config: VoiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(kind, notes, config))
    }

    fn build(kind: DrumKind, notes: &[NoteEvent], config: VoiceConfig) -> Self {
        let hits = filter_pitches(notes, kind.pitches());
        Self {
            kind,
            voices: [Voice::new(config, hits)],
            layout: kind.layout(),
        }
    }

    pub fn kind(&self) -> DrumKind {
        self.kind
    }

    pub fn voice(&self) -> &Voice {
        &self.voices[0]
    }
}

impl Instrument for StickDrum {
    fn info(&self) -> &InstrumentInfo {
        self.kind.info()
    }

    fn tick(&mut self, clock: &FrameClock, tempo: &dyn TempoResolver) {
        self.voices[0].advance(clock, tempo);
    }

    fn seek(&mut self, time: f64) {
        self.voices[0].seek(time);
    }

    fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn layout(&self) -> &Transform {
        &self.layout
    }

    fn present(&self, key: InstrumentKey, sink: &mut dyn SceneSink) {
        sink.instrument(key, self.kind.info(), &self.layout);
        let frame = self.voices[0].frame();
        sink.part(
            key,
            &PartState {
                voice: 0,
                part: Part::Striker,
                transform: Transform::from_translation(STICK_POSITION)
                    .with_rotation(Vec3::new(frame.striker_angle, 0.0, 0.0)),
                visible: frame.striker_visible,
                pose: Pose::Up,
            },
        );
        sink.part(
            key,
            &PartState {
                voice: 0,
                part: Part::Body,
                transform: Transform::from_translation(Vec3::new(0.0, frame.body_offset, 0.0)),
                visible: true,
                pose: frame.pose,
            },
        );
    }
}
