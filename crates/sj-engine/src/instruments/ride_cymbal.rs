//! Ride cymbal: stick, tilting cymbal, and a stick that slides between the
//! bell and the edge depending on what it is about to hit.

use sj_ir::{NoteEvent, TempoResolver, Transform, Vec3};

use crate::config::VoiceConfig;
use crate::ensemble::InstrumentKey;
use crate::instrument::{Instrument, InstrumentInfo};
use crate::pose::Pose;
use crate::scene::{Part, PartState, SceneSink};
use crate::voice::{filter_pitches, FrameClock, Voice};

/// Ride cymbal 1, ride bell, ride cymbal 2.
pub const RIDE_PITCHES: [u8; 3] = [51, 53, 59];
pub const RIDE_BELL: u8 = 53;

/// Stick depth over the bell.
pub const BELL_POSITION: f32 = 12.0;
/// Stick depth over the edge.
pub const EDGE_POSITION: f32 = 18.0;
/// Proportional gain of the slide toward its target, per second.
pub const STICK_MOVE_SPEED: f32 = 30.0;

const INFO: InstrumentInfo = InstrumentInfo {
    name: "Ride Cymbal",
    asset: "DrumSet_Cymbal.obj",
    texture: None,
};

const CYMBAL_POSITION: Vec3 = Vec3::new(13.0, 22.0, -64.0);
const CYMBAL_ROTATION: Vec3 = Vec3::new(10.0, -25.0, 0.0);

pub struct RideCymbal {
    voices: [Voice; 1],
    target: f32,
    slide: f32,
    layout: Transform,
}

impl RideCymbal {
    pub fn new(notes: &[NoteEvent]) -> Self {
        let hits = filter_pitches(notes, &RIDE_PITCHES);
        Self {
            voices: [Voice::new(VoiceConfig::CYMBAL, hits)],
            target: EDGE_POSITION,
            slide: EDGE_POSITION,
            layout: Transform::from_translation(CYMBAL_POSITION)
                .with_rotation(CYMBAL_ROTATION)
                .with_scale(Vec3::splat(1.5)),
        }
    }

    pub fn voice(&self) -> &Voice {
        &self.voices[0]
    }

    /// Current stick depth, between [`BELL_POSITION`] and [`EDGE_POSITION`].
    pub fn stick_position(&self) -> f32 {
        self.slide
    }
}

impl Instrument for RideCymbal {
    fn info(&self) -> &InstrumentInfo {
        &INFO
    }

    fn tick(&mut self, clock: &FrameClock, tempo: &dyn TempoResolver) {
        let outcome = self.voices[0].advance(clock, tempo);
        if let Some(next) = outcome.striking_for {
            self.target = if next.pitch == RIDE_BELL {
                BELL_POSITION
            } else {
                EDGE_POSITION
            };
        }
        self.slide += clock.delta * (self.target - self.slide) * STICK_MOVE_SPEED;
        self.slide = self.slide.clamp(BELL_POSITION, EDGE_POSITION);
    }

    fn seek(&mut self, time: f64) {
        self.voices[0].seek(time);
        self.target = EDGE_POSITION;
        self.slide = EDGE_POSITION;
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
        sink.part(
            key,
            &PartState {
                voice: 0,
                part: Part::Striker,
                transform: Transform::from_translation(Vec3::new(0.0, 2.0, self.slide))
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
                transform: Transform::IDENTITY.with_rotation(Vec3::new(frame.body_offset, 0.0, 0.0)),
                visible: true,
                pose: frame.pose,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use sj_ir::{TempoMap, DEFAULT_TEMPO};

    fn map() -> TempoMap {
        TempoMap::constant(480, DEFAULT_TEMPO).unwrap()
    }

    #[test]
    fn starts_over_the_edge() {
        let ride = RideCymbal::new(&[]);
        assert_eq!(ride.stick_position(), EDGE_POSITION);
    }

    #[test]
    fn slides_toward_bell_for_bell_hits() {
        let mut ride = RideCymbal::new(&[NoteEvent::new(RIDE_BELL, 100, 1920, 2.0)]);
        // Too far out to be approaching: no target yet
        ride.tick(&FrameClock::new(1.0, 0.01), &map());
        assert_eq!(ride.stick_position(), EDGE_POSITION);

        ride.tick(&FrameClock::new(1.95, 0.01), &map());
        // 18 + 0.01 * (12 - 18) * 30 = 16.2
        assert_abs_diff_eq!(ride.stick_position(), 16.2, epsilon = 1e-4);

        for i in 0..20 {
            ride.tick(&FrameClock::new(1.96 + i as f64 * 0.001, 0.01), &map());
        }
        assert!(ride.stick_position() < 13.0);
        assert!(ride.stick_position() >= BELL_POSITION);
    }

    #[test]
    fn slide_never_overshoots() {
        let mut ride = RideCymbal::new(&[NoteEvent::new(RIDE_BELL, 100, 1920, 2.0)]);
        // A long frame would overshoot without the clamp
        ride.tick(&FrameClock::new(1.95, 0.5), &map());
        assert_eq!(ride.stick_position(), BELL_POSITION);
    }

    #[test]
    fn cymbal_tilts_on_hit() {
        let mut ride = RideCymbal::new(&[NoteEvent::new(51, 127, 1920, 2.0)]);
        ride.tick(&FrameClock::new(2.0, 0.016), &map());
        assert_abs_diff_eq!(ride.voice().frame().body_offset, 8.0);
    }

    #[test]
    fn seek_recentres_stick() {
        let mut ride = RideCymbal::new(&[NoteEvent::new(RIDE_BELL, 100, 1920, 2.0)]);
        ride.tick(&FrameClock::new(2.0, 0.5), &map());
        ride.seek(0.0);
        assert_eq!(ride.stick_position(), EDGE_POSITION);
        assert_eq!(ride.pending(), 1);
    }
}
