//! Bass drum: a snap beater, the pedal that drives it, and a shell pushed
//! back along Z on every hit.

use sj_ir::{NoteEvent, TempoResolver, Transform, Vec3};

use crate::config::{StrikerConfig, VoiceConfig};
use crate::ensemble::InstrumentKey;
use crate::instrument::{Instrument, InstrumentInfo};
use crate::pose::Pose;
use crate::scene::{Part, PartState, SceneSink};
use crate::striker::StrikerState;
use crate::voice::{filter_pitches, FrameClock, Voice};

/// Acoustic and electric bass drum.
pub const BASS_DRUM_PITCHES: [u8; 2] = [35, 36];

const INFO: InstrumentInfo = InstrumentInfo {
    name: "Bass Drum",
    asset: "DrumSet_BassDrum.obj",
    texture: None,
};

const DRUM_POSITION: Vec3 = Vec3::new(0.0, 0.0, -80.0);
const BEATER_POSITION: Vec3 = Vec3::new(0.0, 5.5, 2.85);
const PEDAL_POSITION: Vec3 = Vec3::new(0.0, 0.5, 9.0);

pub struct BassDrum {
    voices: [Voice; 1],
    pedal: StrikerState,
    layout: Transform,
}

impl BassDrum {
    /// Build from the percussion channel's notes; other pitches are ignored.
    pub fn new(notes: &[NoteEvent]) -> Self {
        let hits = filter_pitches(notes, &BASS_DRUM_PITCHES);
        Self {
            voices: [Voice::new(VoiceConfig::BASS_DRUM, hits)],
            pedal: StrikerState::new(&StrikerConfig::PEDAL),
            layout: Transform::from_translation(DRUM_POSITION),
        }
    }

    pub fn voice(&self) -> &Voice {
        &self.voices[0]
    }

    pub fn pedal_angle(&self) -> f32 {
        self.pedal.angle()
    }
}

impl Instrument for BassDrum {
    fn info(&self) -> &InstrumentInfo {
        &INFO
    }

    fn tick(&mut self, clock: &FrameClock, tempo: &dyn TempoResolver) {
        let outcome = self.voices[0].advance(clock, tempo);
        if outcome.struck.is_some() {
            self.pedal.strike();
        } else {
            self.pedal
                .approach(&StrikerConfig::PEDAL, None, clock.time, clock.delta, tempo);
        }
    }

    fn seek(&mut self, time: f64) {
        self.voices[0].seek(time);
        self.pedal.raise(&StrikerConfig::PEDAL);
    }

    fn voices(&self) -> &[Voice] {
        &self.voices
    }

    fn layout(&self) -> &Transform {
        &self.layout
    }

    fn present(&self, key: InstrumentKey, sink: &mut dyn SceneSink) {
        sink.instrument(key, &INFO, &self.layout);
        let frame = self.voices[0].frame();

        // Beater and pedal never leave the kit, so both stay shown
        sink.part(
            key,
            &PartState {
                voice: 0,
                part: Part::Striker,
                transform: Transform::from_translation(BEATER_POSITION)
                    .with_rotation(Vec3::new(frame.striker_angle, 0.0, 0.0)),
                visible: true,
                pose: Pose::Up,
            },
        );
        sink.part(
            key,
            &PartState {
                voice: 0,
                part: Part::Pedal,
                transform: Transform::from_translation(PEDAL_POSITION)
                    .with_rotation(Vec3::new(self.pedal.angle(), 0.0, 0.0)),
                visible: true,
                pose: Pose::Up,
            },
        );
        sink.part(
            key,
            &PartState {
                voice: 0,
                part: Part::Body,
                transform: Transform::from_translation(Vec3::new(0.0, 0.0, frame.body_offset)),
                visible: true,
                pose: frame.pose,
            },
        );
    }
}
