//! Allocation-free frame path for a hand-built ensemble.
//!
//! Covers every instrument family with a count-in, dense clusters and a
//! backward seek. Runs without the `alloc_check` feature.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use sj_engine::instruments::{BassDrum, DrumKind, MalletType, Mallets, RideCymbal, StickDrum};
use sj_engine::{Ensemble, PartCounter};
use sj_ir::{NoteEvent, TempoMap, DEFAULT_TEMPO};

/// One note per eighth at 120 BPM for `beats` beats, cycling through `pitches`.
fn eighths(pitches: &[u8], beats: u64) -> Vec<NoteEvent> {
    (0..beats * 2)
        .map(|i| {
            let pitch = pitches[i as usize % pitches.len()];
            NoteEvent::new(pitch, 64 + (i % 64) as u8, i * 240, i as f64 * 0.25)
        })
        .collect()
}

fn ensemble() -> Ensemble {
    let mut e = Ensemble::new(TempoMap::constant(480, DEFAULT_TEMPO).unwrap());
    e.add(Box::new(BassDrum::new(&eighths(&[35, 36], 16))));
    e.add(Box::new(StickDrum::new(DrumKind::Snare, &eighths(&[38, 40], 16))));
    e.add(Box::new(StickDrum::new(DrumKind::HighTom, &eighths(&[50], 16))));
    e.add(Box::new(RideCymbal::new(&eighths(&[51, 53, 59], 16))));
    e.add(Box::new(Mallets::new(MalletType::Marimba, &eighths(&[48, 52, 55, 60, 64], 16), 0)));
    e.add(Box::new(Mallets::new(MalletType::Vibraphone, &eighths(&[60, 60, 72], 16), 1)));
    e
}

fn play(ensemble: &mut Ensemble, from: f64, seconds: f64, fps: f64) {
    let frames = (seconds * fps) as u64;
    assert_no_alloc(|| {
        for frame in 0..frames {
            ensemble.advance(from + frame as f64 / fps, (1.0 / fps) as f32).unwrap();
            let mut sink = PartCounter::default();
            ensemble.present(&mut sink);
        }
    });
}

#[test]
fn count_in_and_playthrough_alloc_free() {
    let mut e = ensemble();
    play(&mut e, -1.0, 10.0, 60.0);
    assert_eq!(e.pending(), 0);
}

#[test]
fn clustered_frames_alloc_free() {
    let mut e = ensemble();
    play(&mut e, 0.0, 10.0, 3.0);
    assert_eq!(e.pending(), 0);
}

#[test]
fn seek_alloc_free() {
    let mut e = ensemble();
    play(&mut e, 0.0, 4.0, 60.0);
    assert_no_alloc(|| e.seek(0.5).unwrap());
    assert!(e.pending() > 0);
    play(&mut e, 0.5, 8.0, 60.0);
    assert_eq!(e.pending(), 0);
}
