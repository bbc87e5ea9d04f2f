// Pattern - A looping drum pattern made of pad hits at symbolic times
// Serialized in the same JSON shape the UI and pattern library exchange

use super::SequencerError;
use super::timeline::{SymbolicTime, Tempo, TimeSignature};
use crate::pads::PadId;
use serde::{Deserialize, Serialize};

/// Longest pattern accepted, in bars
pub const MAX_LENGTH_IN_BARS: u32 = 256;

/// Unique identifier for patterns ("basic-rock", or a UUID for imports)
pub type PatternId = String;

/// One pad hit inside a pattern
///
/// `padId` is a `u8`: JSON values outside 0-255 fail to deserialize and
/// reject the whole pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternEvent {
    pub time: SymbolicTime,
    pub pad_id: PadId,
}

impl PatternEvent {
    pub fn new(time: SymbolicTime, pad_id: PadId) -> Self {
        Self { time, pad_id }
    }
}

/// A drum pattern
///
/// Several events may share a time. Event times are parsed once when the
/// pattern is built or deserialized and kept as [`SymbolicTime`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    /// Unique identifier
    pub id: PatternId,

    /// Pattern name
    pub name: String,

    /// Free-form category ("rock", "funk", "custom", ...)
    pub category: String,

    /// Playback tempo
    #[serde(rename = "bpm")]
    pub tempo: Tempo,

    pub time_signature: TimeSignature,

    /// Length of the pattern in bars (1 to [`MAX_LENGTH_IN_BARS`])
    /// Determines when the pattern loops
    pub length_in_bars: u32,

    /// 1 (easiest) to 5
    pub difficulty: u8,

    events: Vec<PatternEvent>,
}

impl Pattern {
    /// Create a new empty pattern
    pub fn new(
        id: impl Into<PatternId>,
        name: impl Into<String>,
        tempo: Tempo,
        time_signature: TimeSignature,
        length_in_bars: u32,
    ) -> Result<Self, SequencerError> {
        if !(1..=MAX_LENGTH_IN_BARS).contains(&length_in_bars) {
            return Err(SequencerError::InvalidLength);
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            category: "custom".to_string(),
            tempo,
            time_signature,
            length_in_bars,
            difficulty: 1,
            events: Vec::new(),
        })
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the difficulty (1-5)
    pub fn with_difficulty(mut self, difficulty: u8) -> Result<Self, SequencerError> {
        if !(1..=5).contains(&difficulty) {
            return Err(SequencerError::InvalidDifficulty(difficulty));
        }
        self.difficulty = difficulty;
        Ok(self)
    }

    /// Check the invariants a deserialized pattern may have broken
    pub fn validate(&self) -> Result<(), SequencerError> {
        if !(1..=MAX_LENGTH_IN_BARS).contains(&self.length_in_bars) {
            return Err(SequencerError::InvalidLength);
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(SequencerError::InvalidDifficulty(self.difficulty));
        }
        Ok(())
    }

    /// Parse the external JSON representation
    pub fn from_json(json: &str) -> Result<Self, SequencerError> {
        let pattern: Pattern = serde_json::from_str(json)
            .map_err(|e| SequencerError::InvalidPattern(e.to_string()))?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Serialize to the external JSON representation
    pub fn to_json(&self) -> Result<String, SequencerError> {
        serde_json::to_string_pretty(self).map_err(|e| SequencerError::InvalidPattern(e.to_string()))
    }

    /// Get all events
    pub fn events(&self) -> &[PatternEvent] {
        &self.events
    }

    /// Add a hit
    pub fn add_event(&mut self, time: SymbolicTime, pad_id: PadId) {
        self.events.push(PatternEvent::new(time, pad_id));
    }

    /// Replace all events
    pub fn set_events(&mut self, events: Vec<PatternEvent>) {
        self.events = events;
    }

    /// Remove every hit of `pad_id` at `time`
    /// Returns the number of removed events
    pub fn remove_events_at(&mut self, time: SymbolicTime, pad_id: PadId) -> usize {
        let before = self.events.len();
        self.events
            .retain(|event| !(event.time == time && event.pad_id == pad_id));
        before - self.events.len()
    }

    /// Events of a single pad
    pub fn events_for_pad(&self, pad_id: PadId) -> impl Iterator<Item = &PatternEvent> + '_ {
        self.events.iter().filter(move |event| event.pad_id == pad_id)
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Get the number of events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Check if pattern is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of 16th-note steps in the whole pattern
    pub fn total_steps(&self) -> u32 {
        self.length_in_bars
            .saturating_mul(self.time_signature.steps_per_bar())
    }

    /// Seconds from pattern start to an event, at the pattern tempo
    pub fn event_seconds(&self, event: &PatternEvent) -> f64 {
        event
            .time
            .to_seconds(&self.tempo, self.time_signature.beats_per_bar())
    }

    /// Loop length in seconds: `secPerBeat · beatsPerBar · lengthInBars`
    pub fn duration_seconds(&self) -> f64 {
        self.tempo
            .bar_duration_seconds(self.time_signature.beats_per_bar())
            * self.length_in_bars as f64
    }
}
