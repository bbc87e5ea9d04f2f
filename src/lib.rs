// Drumpad Trainer - Rhythm timing engine
// Library exports for the demo binary, tests and benchmarks

pub mod audio;
pub mod config;
pub mod engine;
pub mod messaging;
pub mod midi;
pub mod pads;
pub mod practice;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use audio::{AudioContextCell, AudioOutput, Click, ClickVoice, LogOutput, SharedOutput, shared_output};
pub use config::{ConfigError, EngineConfig};
pub use engine::PracticeEngine;
pub use messaging::{Notification, create_notification_channel};
pub use midi::{MidiEvent, MidiFileError};
pub use pads::PadId;
pub use practice::{Grade, HitAnalyzer, HitResult, PracticeSession, PracticeStats};
pub use sequencer::{
    ClickPreset, ManualTransport, MetronomeEngine, MetronomeSettings, Pattern, PatternEvent,
    PatternScheduler, SequencerError, StepGrid, SymbolicTime, Tempo, TimeSignature,
    TransportClock, TransportState,
};
