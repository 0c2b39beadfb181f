//! Standard MIDI File (SMF) loader.
//!
//! Only note-ons, program changes and tempo meta events matter to the
//! animation; everything else is skipped. Tracks are merged in tick order
//! so a program change in one track applies to notes in another.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use sj_ir::{Tempo, TempoChange, TempoMap, Timeline};
use tracing::debug;

use crate::FormatError;

/// A channel message at an absolute tick.
#[derive(Clone, Copy)]
struct ChannelEvent {
    tick: u64,
    channel: u8,
    message: MidiMessage,
}

/// Parse a Standard MIDI File into a note timeline.
///
/// Note-ons with velocity 0 are note-offs and are dropped. Each note is
/// filed under the program its channel had selected when it sounded.
pub fn load_midi(data: &[u8]) -> Result<Timeline, FormatError> {
    let smf = Smf::parse(data)?;

    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) => tpq.as_int(),
        Timing::Timecode(..) => return Err(FormatError::UnsupportedTiming),
    };

    debug!(
        "parsing MIDI file: {:?}, {} tracks, {} ticks per quarter",
        smf.header.format,
        smf.tracks.len(),
        ticks_per_quarter
    );

    let mut tempo_changes = Vec::new();
    let mut events = Vec::new();
    for track in &smf.tracks {
        let mut tick = 0u64;
        for event in track {
            tick += event.delta.as_int() as u64;
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(micros)) => {
                    tempo_changes.push(TempoChange::new(tick, Tempo::from_micros(micros.as_int())));
                }
                TrackEventKind::Midi { channel, message } => events.push(ChannelEvent {
                    tick,
                    channel: channel.as_int(),
                    message,
                }),
                _ => {}
            }
        }
    }

    debug!("found {} tempo changes", tempo_changes.len());
    let tempo_map = TempoMap::new(ticks_per_quarter, tempo_changes)?;
    let mut timeline = Timeline::new(tempo_map);

    // Stable, so same-tick events keep their order within a track
    events.sort_by_key(|e| e.tick);

    let mut programs = [0u8; 16];
    for event in &events {
        match event.message {
            MidiMessage::ProgramChange { program } => {
                programs[event.channel as usize] = program.as_int();
            }
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                timeline.push_note(
                    event.channel,
                    programs[event.channel as usize],
                    key.as_int(),
                    vel.as_int(),
                    event.tick,
                );
            }
            _ => {}
        }
    }
    timeline.sort();

    debug!(
        "loaded {} notes on {} channel tracks, {:.2}s",
        timeline.note_count(),
        timeline.tracks.len(),
        timeline.duration_seconds()
    );

    Ok(timeline)
}
