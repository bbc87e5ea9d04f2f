// Sequencer module
// Musical time, patterns, step grid, transport, pattern playback and metronome

pub mod library;
pub mod metronome;
pub mod pattern;
pub mod scheduler;
pub mod step_grid;
pub mod timeline;
pub mod transport;

use thiserror::Error;

pub use metronome::{ClickPreset, MetronomeEngine, MetronomeSettings};
pub use pattern::{Pattern, PatternEvent};
pub use scheduler::{ExpectedEvent, PatternScheduler, SchedulerState};
pub use step_grid::StepGrid;
pub use timeline::{SymbolicTime, Tempo, TimeSignature};
pub use transport::{ManualTransport, Tick, TickHandle, TransportClock, TransportState};

/// Errors for invalid musical data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequencerError {
    #[error("Invalid time signature {numerator}/{denominator} (denominator must be 2, 4, 8 or 16)")]
    InvalidTimeSignature { numerator: u8, denominator: u8 },

    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    #[error("Pattern length must be between 1 and {} bars", pattern::MAX_LENGTH_IN_BARS)]
    InvalidLength,

    #[error("Difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),

    #[error("Grouping {grouping:?} does not sum to {beats} beats")]
    InvalidGrouping { grouping: Vec<u8>, beats: u8 },

    #[error("Invalid pattern data: {0}")]
    InvalidPattern(String),
}
