//! Integration test: load MIDI fixture → assign instruments → play frames → verify animation.

use approx::assert_abs_diff_eq;
use sj_engine::instruments::{DrumKind, KitPiece, MalletType};
use sj_engine::{Ensemble, EngineError, Pose, RecoilPhase};
use sj_formats::{load_midi, FormatError};
use sj_master::{Controller, KIT_PIECES};
use std::fs;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/midi")
}

fn load_controller(name: &str) -> Controller {
    let data = fs::read(fixtures_dir().join(name)).unwrap();
    let mut ctrl = Controller::new();
    ctrl.load_midi(&data).unwrap();
    ctrl
}

fn find(ensemble: &Ensemble, name: &str) -> sj_engine::InstrumentKey {
    ensemble
        .iter()
        .find(|(_, i)| i.info().name == name)
        .map(|(k, _)| k)
        .unwrap_or_else(|| panic!("no instrument named {}", name))
}

// --- groove.mid ---

#[test]
fn groove_loads_every_note() {
    let ctrl = load_controller("groove.mid");
    let timeline = ctrl.timeline();
    // 53 percussion, 9 marimba, 12 vibraphone, 2 piano
    assert_eq!(timeline.note_count(), 76);
    assert_eq!(timeline.tracks.len(), 4);
    // 8 quarters at 120 BPM, then 7.75 at 150 BPM
    assert_abs_diff_eq!(timeline.duration_seconds(), 7.1, epsilon = 1e-9);
}

#[test]
fn groove_assigns_full_kit_and_two_mallets() {
    let ctrl = load_controller("groove.mid");
    let assignment = ctrl.assignment();
    assert_eq!(assignment.kit.as_slice(), &KIT_PIECES);
    assert_eq!(assignment.mallets.len(), 2);
    assert_eq!(assignment.mallets[0].kind, MalletType::Marimba);
    assert_eq!(assignment.mallets[1].kind, MalletType::Vibraphone);
    assert_eq!(assignment.skipped, 1);
    assert!(assignment.kit.contains(&KitPiece::Stick(DrumKind::LowFloorTom)));
}

#[test]
fn groove_pending_excludes_unplayable_notes() {
    let ensemble = load_controller("groove.mid").ensemble();
    assert_eq!(ensemble.len(), 11);
    // Hi-hat and the out-of-range marimba note have no voice
    assert_eq!(ensemble.pending(), 72);
}

#[test]
fn groove_renders_to_the_end() {
    let report = load_controller("groove.mid").render_frames(60, 60.0).unwrap();
    assert_eq!(report.events, 72);
    assert!(report.seconds >= 8.0);
    assert!(report.peak_down >= 3);
}

#[test]
fn kick_strikes_on_the_beat() {
    let ctrl = load_controller("groove.mid");
    let mut ensemble = ctrl.ensemble();
    let key = find(&ensemble, "Bass Drum");

    ensemble.advance(0.5, 0.1).unwrap();
    ensemble.advance(0.9, 0.4).unwrap();
    assert_eq!(ensemble.get(key).unwrap().voices()[0].phase(), RecoilPhase::Returning);

    // Third beat of the first bar
    ensemble.advance(1.0, 0.1).unwrap();
    let frame = ensemble.get(key).unwrap().voices()[0].frame();
    assert_eq!(frame.phase, RecoilPhase::Struck);
    assert_eq!(frame.pose, Pose::Down);
    assert_eq!(frame.striker_angle, 0.0);
}

#[test]
fn tempo_change_keeps_landing_on_onset() {
    let ctrl = load_controller("groove.mid");
    let mut ensemble = ctrl.ensemble();
    let key = find(&ensemble, "Snare Drum");

    // Snare on beat 2 of bar 3 lands at 4.0 + 0.4 s, after the change to 150 BPM
    ensemble.seek(4.3).unwrap();
    ensemble.advance(4.39, 0.09).unwrap();
    let approaching = ensemble.get(key).unwrap().voices()[0].frame();
    // 150 BPM * 4 = 600 degrees per second, 10 ms out
    assert_abs_diff_eq!(approaching.striker_angle, 6.0, epsilon = 1e-2);
    assert!(approaching.striker_visible);

    ensemble.advance(4.4, 0.01).unwrap();
    let struck = ensemble.get(key).unwrap().voices()[0].frame();
    assert_eq!(struck.striker_angle, 0.0);
    assert_eq!(struck.phase, RecoilPhase::Struck);
}

#[test]
fn backward_time_needs_seek() {
    let ctrl = load_controller("groove.mid");
    let mut ensemble = ctrl.ensemble();
    ensemble.advance(3.0, 0.1).unwrap();
    let pending = ensemble.pending();

    assert!(matches!(ensemble.advance(2.0, 0.1), Err(EngineError::BackwardTime { .. })));
    assert_eq!(ensemble.pending(), pending);

    ensemble.seek(2.0).unwrap();
    assert!(ensemble.pending() > pending);
    ensemble.advance(2.0, 0.0).unwrap();
}

#[test]
fn marimba_bars_follow_their_notes() {
    let ctrl = load_controller("groove.mid");
    let mut ensemble = ctrl.ensemble();
    let key = find(&ensemble, "Marimba");

    // C4 at 0, D4 at 1.0 s
    ensemble.advance(0.5, 0.016).unwrap();
    ensemble.advance(1.0, 0.5).unwrap();
    let marimba = ensemble.get(key).unwrap();
    let c4 = &marimba.voices()[60 - 21];
    let d4 = &marimba.voices()[62 - 21];
    assert_eq!(d4.phase(), RecoilPhase::Struck);
    assert_ne!(c4.phase(), RecoilPhase::Struck);
    assert!(!c4.frame().striker_visible || c4.frame().striker_angle > 0.0);
}

// --- smpte.mid ---

#[test]
fn smpte_timing_is_rejected() {
    let data = fs::read(fixtures_dir().join("smpte.mid")).unwrap();
    assert!(matches!(load_midi(&data), Err(FormatError::UnsupportedTiming)));

    let mut ctrl = Controller::new();
    assert!(ctrl.load_midi(&data).is_err());
}
