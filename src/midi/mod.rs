// MIDI module
// Channel messages, the GM drum map and Standard MIDI File import/export

pub mod drum_map;
pub mod event;
pub mod file;

use crate::sequencer::SequencerError;
use thiserror::Error;

pub use drum_map::{DRUM_CHANNEL, note_to_pad, pad_to_note};
pub use event::MidiEvent;
pub use file::{TICKS_PER_QUARTER, decode, decode_named, encode, export_file, import_file};

/// Errors that abort a MIDI file import or export
#[derive(Error, Debug)]
pub enum MidiFileError {
    #[error("Not a valid MIDI file (missing MThd header)")]
    MissingHeader,

    #[error("Unsupported MIDI format {0} (only 0 and 1 supported)")]
    UnsupportedFormat(u16),

    #[error("Imported data does not form a valid pattern: {0}")]
    InvalidPattern(#[from] SequencerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
