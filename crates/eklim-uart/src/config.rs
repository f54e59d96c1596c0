//! Retrieval configuration
//!
//! Timing and protocol knobs for fault-log retrieval, loadable from TOML.
//! Every field has a default matching the gateway's behaviour, so an empty
//! document is a valid configuration.

use std::path::Path;
use std::time::Duration;

use eklim_core::FaultError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for FaultError {
    fn from(err: ConfigError) -> Self {
        FaultError::Config(err.to_string())
    }
}

/// Settings for count queries and bulk retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Delay before each record request (milliseconds)
    #[serde(default = "default_pacing_interval")]
    pub pacing_interval_ms: u64,
    /// Upper bound for a single record request (milliseconds)
    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,
    /// Upper bound for the count query (milliseconds)
    #[serde(default = "default_count_timeout")]
    pub count_timeout_ms: u64,
    /// Subtracted from the device's reported count
    ///
    /// The device reports one more than the number of retrievable records.
    #[serde(default = "default_count_offset")]
    pub count_offset: u32,
    /// Responses of this length or shorter are not decoded
    #[serde(default = "default_min_record_response_len")]
    pub min_record_response_len: usize,
    /// Highest addressable device slot (five-digit command field)
    #[serde(default = "default_max_record_index")]
    pub max_record_index: u32,
}

fn default_pacing_interval() -> u64 {
    100
}

fn default_command_timeout() -> u64 {
    3000
}

fn default_count_timeout() -> u64 {
    2000
}

fn default_count_offset() -> u32 {
    1
}

fn default_min_record_response_len() -> usize {
    10
}

fn default_max_record_index() -> u32 {
    9999
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            pacing_interval_ms: default_pacing_interval(),
            command_timeout_ms: default_command_timeout(),
            count_timeout_ms: default_count_timeout(),
            count_offset: default_count_offset(),
            min_record_response_len: default_min_record_response_len(),
            max_record_index: default_max_record_index(),
        }
    }
}

impl RetrievalConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "command_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.count_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "count_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if !(1..=99_999).contains(&self.max_record_index) {
            return Err(ConfigError::Invalid(format!(
                "max_record_index {} must be within 1..=99999",
                self.max_record_index
            )));
        }
        Ok(())
    }

    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.pacing_interval_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn count_timeout(&self) -> Duration {
        Duration::from_millis(self.count_timeout_ms)
    }
}

/// Mock channel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Simulated response latency (milliseconds)
    #[serde(default)]
    pub latency_ms: u64,
}
