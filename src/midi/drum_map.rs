// General MIDI drum map for the pads
// The mapping is many-to-one: several pads share a note, so importing
// an exported file folds them onto one canonical pad.

use crate::pads::PadId;

/// General MIDI percussion channel (channel 10, zero-based)
pub const DRUM_CHANNEL: u8 = 9;

const PAD_TO_NOTE: [(PadId, u8); 10] = [
    (0, 36),  // Bass Kick 3 -> Bass Drum 1
    (1, 35),  // Bass Kick 2 -> Acoustic Bass Drum
    (2, 36),  // Bass Kick -> Bass Drum 1
    (6, 36),  // Kick -> Bass Drum 1
    (7, 38),  // Ghost Snare -> Acoustic Snare
    (9, 40),  // Snare 2 -> Electric Snare
    (10, 42), // Hat 1 -> Closed Hi-Hat
    (11, 38), // Snare 1 -> Acoustic Snare
    (14, 44), // Hat 2 -> Pedal Hi-Hat
    (15, 46), // Hat 3 -> Open Hi-Hat
];

const NOTE_TO_PAD: [(u8, PadId); 7] = [
    (35, 1),
    (36, 2),
    (38, 11),
    (40, 9),
    (42, 10),
    (44, 14),
    (46, 15),
];

/// GM note for a pad, `None` for pads without a sample
pub fn pad_to_note(pad_id: PadId) -> Option<u8> {
    PAD_TO_NOTE
        .iter()
        .find(|(pad, _)| *pad == pad_id)
        .map(|(_, note)| *note)
}

/// Canonical pad for a GM note, `None` for unmapped notes
pub fn note_to_pad(note: u8) -> Option<PadId> {
    NOTE_TO_PAD
        .iter()
        .find(|(n, _)| *n == note)
        .map(|(_, pad)| *pad)
}
