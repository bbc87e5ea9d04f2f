//! MIDI file import/export integration tests
//!
//! Round trips patterns through `.mid` files on disk.

use drumpad_trainer::midi::{self, MidiFileError, TICKS_PER_QUARTER};
use drumpad_trainer::pads::{BASS_KICK, BASS_KICK_2, BASS_KICK_3, GHOST_SNARE, HAT_1, HAT_2, HAT_3, KICK, SNARE_1, SNARE_2};
use drumpad_trainer::sequencer::library::default_patterns;
use drumpad_trainer::{Pattern, PatternEvent, SymbolicTime, Tempo, TimeSignature};
use std::collections::BTreeSet;

fn pattern(events: &[(SymbolicTime, u8)], bars: u32) -> Pattern {
    let mut pattern = Pattern::new(
        "integration",
        "Integration",
        Tempo::new(96.0).unwrap(),
        TimeSignature::four_four(),
        bars,
    )
    .unwrap();
    for &(time, pad) in events {
        pattern.add_event(time, pad);
    }
    pattern
}

fn event_set(pattern: &Pattern) -> BTreeSet<PatternEvent> {
    pattern.events().iter().copied().collect()
}

#[test]
fn test_canonical_pads_round_trip_exactly() {
    let canonical = [BASS_KICK_2, BASS_KICK, SNARE_2, HAT_1, SNARE_1, HAT_2, HAT_3];
    let events: Vec<(SymbolicTime, u8)> = canonical
        .iter()
        .enumerate()
        .map(|(step, &pad)| (SymbolicTime::from_step(step as u32 * 3, 16), pad))
        .collect();
    let original = pattern(&events, 2);

    let decoded = midi::decode(&midi::encode(&original)).unwrap();

    assert_eq!(event_set(&decoded), event_set(&original));
    assert_eq!(decoded.tempo.bpm(), 96.0);
    assert_eq!(decoded.time_signature, TimeSignature::four_four());
}

#[test]
fn test_aliased_pads_collapse() {
    let original = pattern(
        &[
            (SymbolicTime::zero(), BASS_KICK_3),
            (SymbolicTime::new(0, 1, 0), KICK),
            (SymbolicTime::new(0, 2, 0), GHOST_SNARE),
        ],
        1,
    );

    let decoded = midi::decode(&midi::encode(&original)).unwrap();
    let pads: Vec<u8> = decoded.events().iter().map(|e| e.pad_id).collect();
    assert_eq!(pads, vec![BASS_KICK, BASS_KICK, SNARE_1]);
}

#[test]
fn test_length_follows_last_hit() {
    // A one-bar pattern whose only hit is on the last step stays one bar
    let decoded = midi::decode(&midi::encode(&pattern(&[(SymbolicTime::new(0, 3, 3), HAT_1)], 1))).unwrap();
    assert_eq!(decoded.length_in_bars, 1);

    // Trailing empty bars are not recorded in the file
    let decoded = midi::decode(&midi::encode(&pattern(&[(SymbolicTime::zero(), HAT_1)], 4))).unwrap();
    assert_eq!(decoded.length_in_bars, 1);

    // A hit in bar 3 makes three bars
    let decoded = midi::decode(&midi::encode(&pattern(&[(SymbolicTime::new(2, 0, 0), HAT_1)], 4))).unwrap();
    assert_eq!(decoded.length_in_bars, 3);
}

#[test]
fn test_library_survives_export() {
    for original in default_patterns() {
        let bytes = midi::encode(&original);
        assert_eq!(u16::from_be_bytes([bytes[12], bytes[13]]), TICKS_PER_QUARTER);

        let decoded = midi::decode(&bytes).unwrap();
        assert_eq!(decoded.tempo.bpm(), original.tempo.bpm().round(), "{}", original.id);
        assert_eq!(decoded.time_signature, original.time_signature);
        assert!(decoded.length_in_bars <= original.length_in_bars);
        assert!(decoded.event_count() <= original.event_count());
    }
}

#[test]
fn test_file_export_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Funky Groove.midi");
    let original = pattern(&[(SymbolicTime::zero(), HAT_3), (SymbolicTime::new(0, 2, 2), SNARE_2)], 1);

    midi::export_file(&path, &original).unwrap();
    let imported = midi::import_file(&path).unwrap();

    assert_eq!(imported.name, "Funky Groove");
    assert_eq!(imported.category, "custom");
    assert_eq!(imported.difficulty, 1);
    assert_ne!(imported.id, original.id);
    assert_eq!(event_set(&imported), event_set(&original));
}

#[test]
fn test_import_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = midi::import_file(dir.path().join("nope.mid"));
    assert!(matches!(result, Err(MidiFileError::Io(_))));
}

#[test]
fn test_import_non_midi_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.mid");
    std::fs::write(&path, b"not a midi file").unwrap();

    let result = midi::import_file(&path);
    assert!(matches!(result, Err(MidiFileError::MissingHeader)));
}
