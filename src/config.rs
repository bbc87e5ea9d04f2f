// Engine configuration
// Stored as RON next to user data, or accepted as JSON from the UI

use crate::practice::AnalyzerSettings;
use crate::practice::session::DEFAULT_HISTORY_LEN;
use crate::sequencer::MetronomeSettings;
use ron::{from_str as ron_from_str, to_string as ron_to_string};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything tunable about the practice engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hit grading
    pub analyzer: AnalyzerSettings,

    /// Graded hits kept in the session history
    pub history_len: usize,

    /// Initial metronome settings
    pub metronome: MetronomeSettings,

    /// Capacity of the UI notification channel
    pub notification_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerSettings::default(),
            history_len: DEFAULT_HISTORY_LEN,
            metronome: MetronomeSettings::default(),
            notification_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Check value ranges serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analyzer = &self.analyzer;
        if !(analyzer.window_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "grading window must be positive, got {}",
                analyzer.window_seconds
            )));
        }

        let thresholds = &analyzer.thresholds;
        if !(0.0 <= thresholds.perfect_ms
            && thresholds.perfect_ms <= thresholds.good_ms
            && thresholds.good_ms <= thresholds.early_late_ms)
        {
            return Err(ConfigError::Invalid(
                "grade thresholds must satisfy 0 <= perfect <= good <= early/late".to_string(),
            ));
        }

        if analyzer.consumed_keep > analyzer.consumed_capacity {
            return Err(ConfigError::Invalid(format!(
                "consumed_keep ({}) exceeds consumed_capacity ({})",
                analyzer.consumed_keep, analyzer.consumed_capacity
            )));
        }

        if self.metronome.volume > 100 {
            return Err(ConfigError::Invalid(format!(
                "metronome volume must be 0-100, got {}",
                self.metronome.volume
            )));
        }
        self.metronome
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.notification_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notification_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse RON; missing fields take their defaults
    pub fn from_ron_str(ron_data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron_from_str(ron_data).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to deserialize from RON: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron_to_string(self).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to serialize to RON: {}", e))
        })
    }

    /// Parse JSON; missing fields take their defaults
    pub fn from_json_str(json_data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_data).map_err(|e| {
            ConfigError::SerializationError(format!("Failed to deserialize from JSON: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a RON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }

    /// Save as a RON config file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}
