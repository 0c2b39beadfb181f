//! Which instruments a timeline puts on stage.

use heapless::Vec as FixedVec;
use sj_engine::instruments::{create_kit_piece, create_mallets, DrumKind, KitPiece, MalletType};
use sj_engine::Ensemble;
use sj_ir::{NoteEvent, Timeline};
use tracing::{debug, info};

/// Every kit piece the percussion channel can feed.
pub const KIT_PIECES: [KitPiece; 9] = [
    KitPiece::BassDrum,
    KitPiece::Stick(DrumKind::Snare),
    KitPiece::Stick(DrumKind::LowFloorTom),
    KitPiece::Stick(DrumKind::HighFloorTom),
    KitPiece::Stick(DrumKind::LowTom),
    KitPiece::Stick(DrumKind::LowMidTom),
    KitPiece::Stick(DrumKind::HighMidTom),
    KitPiece::Stick(DrumKind::HighTom),
    KitPiece::RideCymbal,
];

/// A mallet instrument and the channel track feeding it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MalletPart {
    pub kind: MalletType,
    pub channel: u8,
    pub program: u8,
    /// Position among the mallet instruments on stage.
    pub index: usize,
}

/// Instruments chosen for a timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    /// Kit pieces with at least one note to play.
    pub kit: FixedVec<KitPiece, 9>,
    /// Every percussion-channel note, sorted by onset.
    pub percussion: Vec<NoteEvent>,
    pub mallets: Vec<MalletPart>,
    /// Melodic tracks no instrument plays.
    pub skipped: usize,
}

impl Assignment {
    pub fn instrument_count(&self) -> usize {
        self.kit.len() + self.mallets.len()
    }
}

/// Decide which instruments play `timeline`.
///
/// All percussion-channel tracks feed one kit, whatever program they were
/// under; only pieces that receive notes are kept. Melodic tracks become
/// mallet instruments when their program is a mallet program.
pub fn assign(timeline: &Timeline) -> Assignment {
    let mut percussion: Vec<NoteEvent> = timeline
        .tracks
        .iter()
        .filter(|t| t.is_percussion())
        .flat_map(|t| t.notes.iter().copied())
        .collect();
    percussion.sort_by(|a, b| a.onset_seconds.total_cmp(&b.onset_seconds));

    let kit: FixedVec<KitPiece, 9> = KIT_PIECES.iter().copied().filter(|p| p.plays(&percussion)).collect();

    let mut mallets = Vec::new();
    let mut skipped = 0;
    for track in timeline.tracks.iter().filter(|t| !t.is_percussion()) {
        match MalletType::from_program(track.program) {
            Some(kind) => mallets.push(MalletPart {
                kind,
                channel: track.channel,
                program: track.program,
                index: mallets.len(),
            }),
            None => {
                debug!(
                    "no instrument for program {} on channel {} ({} notes)",
                    track.program,
                    track.channel,
                    track.notes.len()
                );
                skipped += 1;
            }
        }
    }

    info!(
        "assigned {} kit pieces and {} mallet instruments, skipped {} tracks",
        kit.len(),
        mallets.len(),
        skipped
    );

    Assignment {
        kit,
        percussion,
        mallets,
        skipped,
    }
}

/// Build an ensemble playing `timeline` with the instruments in `assignment`.
pub fn build_ensemble(timeline: &Timeline, assignment: &Assignment) -> Ensemble {
    let mut ensemble = Ensemble::new(timeline.tempo_map.clone());
    for &piece in &assignment.kit {
        ensemble.add(create_kit_piece(piece, &assignment.percussion));
    }
    for part in &assignment.mallets {
        let notes = timeline
            .tracks
            .iter()
            .find(|t| t.channel == part.channel && t.program == part.program)
            .map(|t| t.notes.as_slice())
            .unwrap_or_default();
        if let Some(instrument) = create_mallets(part.program, notes, part.index) {
            ensemble.add(instrument);
        }
    }
    ensemble
}

#[cfg(test)]
mod tests {
    use super::*;
    use sj_ir::{TempoMap, DEFAULT_TEMPO, PERCUSSION_CHANNEL};

    fn timeline() -> Timeline {
        let mut tl = Timeline::new(TempoMap::constant(480, DEFAULT_TEMPO).unwrap());
        tl.push_note(PERCUSSION_CHANNEL, 0, 36, 100, 0);
        tl.push_note(PERCUSSION_CHANNEL, 0, 38, 100, 480);
        tl.push_note(PERCUSSION_CHANNEL, 25, 53, 100, 960);
        tl.push_note(0, 12, 60, 100, 0);
        tl.push_note(1, 11, 64, 100, 0);
        tl.push_note(2, 0, 60, 100, 0);
        tl.sort();
        tl
    }

    #[test]
    fn kit_keeps_only_played_pieces() {
        let a = assign(&timeline());
        assert_eq!(
            a.kit.as_slice(),
            &[KitPiece::BassDrum, KitPiece::Stick(DrumKind::Snare), KitPiece::RideCymbal]
        );
        assert_eq!(a.percussion.len(), 3);
    }

    #[test]
    fn mallet_programs_become_mallets() {
        let a = assign(&timeline());
        assert_eq!(a.mallets.len(), 2);
        assert_eq!(a.mallets[0].kind, MalletType::Marimba);
        assert_eq!(a.mallets[0].index, 0);
        assert_eq!(a.mallets[1].kind, MalletType::Vibraphone);
        assert_eq!(a.mallets[1].index, 1);
        assert_eq!(a.skipped, 1);
        assert_eq!(a.instrument_count(), 5);
    }

    #[test]
    fn ensemble_holds_every_assigned_instrument() {
        let tl = timeline();
        let a = assign(&tl);
        let ensemble = build_ensemble(&tl, &a);
        assert_eq!(ensemble.len(), 5);
        assert_eq!(ensemble.pending(), 5);
    }

    #[test]
    fn empty_timeline_assigns_nothing() {
        let tl = Timeline::new(TempoMap::constant(480, DEFAULT_TEMPO).unwrap());
        let a = assign(&tl);
        assert_eq!(a.instrument_count(), 0);
        assert!(build_ensemble(&tl, &a).is_empty());
    }
}
