//! Benchmarks for the per-frame ensemble tick.
//!
//! Run with: cargo bench -p sj-engine
//!
//! A 60 fps frame leaves 16.7ms for everything; the engine should use a
//! tiny fraction of it even with a full kit and several mallet instruments.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sj_engine::instruments::{create_kit_piece, create_mallets, DrumKind, KitPiece};
use sj_engine::{Ensemble, PartCounter};
use sj_ir::{NoteEvent, TempoMap, DEFAULT_TEMPO};

const FPS: f64 = 60.0;

/// Sixteenth notes at 120 BPM for `seconds`, cycling through `pitches`.
fn pattern(pitches: &[u8], seconds: f64) -> Vec<NoteEvent> {
    let step = 0.125;
    (0..(seconds / step) as u64)
        .map(|i| {
            let pitch = pitches[i as usize % pitches.len()];
            NoteEvent::new(pitch, 64 + (i % 64) as u8, i * 120, i as f64 * step)
        })
        .collect()
}

fn build(mallet_count: usize) -> Ensemble {
    let mut ensemble = Ensemble::new(TempoMap::constant(480, DEFAULT_TEMPO).unwrap());
    let drums = pattern(&[36, 38, 42, 45, 51, 53], 600.0);
    for piece in [
        KitPiece::BassDrum,
        KitPiece::Stick(DrumKind::Snare),
        KitPiece::Stick(DrumKind::LowTom),
        KitPiece::RideCymbal,
    ] {
        ensemble.add(create_kit_piece(piece, &drums));
    }
    let melody: Vec<u8> = (48..84).collect();
    for i in 0..mallet_count {
        let notes = pattern(&melody, 600.0);
        ensemble.add(create_mallets(11 + (i % 3) as u8, &notes, i).unwrap());
    }
    ensemble
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("ensemble/advance");
    for mallets in [0, 1, 4] {
        let mut ensemble = build(mallets);
        let mut frame = 0u64;
        group.bench_with_input(BenchmarkId::new("mallets", mallets), &mallets, |b, _| {
            b.iter(|| {
                frame += 1;
                let time = frame as f64 / FPS;
                ensemble.advance(black_box(time), (1.0 / FPS) as f32).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_present(c: &mut Criterion) {
    let mut ensemble = build(4);
    ensemble.advance(10.0, 1.0 / 60.0).unwrap();
    c.bench_function("ensemble/present", |b| {
        b.iter(|| {
            let mut sink = PartCounter::default();
            ensemble.present(&mut sink);
            black_box(sink)
        })
    });
}

criterion_group!(benches, bench_advance, bench_present);
criterion_main!(benches);
