use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0} must be greater than zero")]
    Zero(&'static str),
}

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ranking length when a request names none.
    pub default_limit: usize,
    /// Window length when a request names no end.
    pub default_window_secs: u64,
    /// Distance between the current window and the reference window.
    pub reference_offset_secs: u64,
    /// Upper bound on in-flight channel calls, across both windows.
    pub max_concurrent_requests: usize,
    pub source_timeout_ms: u64,
}

impl EngineConfig {
    pub fn v0() -> Self {
        Self {
            default_limit: 40,
            default_window_secs: 7 * 24 * 60 * 60,
            reference_offset_secs: 7 * 24 * 60 * 60,
            max_concurrent_requests: 16,
            source_timeout_ms: 5_000,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::Zero("default_limit"));
        }
        if self.default_window_secs == 0 {
            return Err(ConfigError::Zero("default_window_secs"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::Zero("max_concurrent_requests"));
        }
        if self.source_timeout_ms == 0 {
            return Err(ConfigError::Zero("source_timeout_ms"));
        }
        Ok(())
    }

    pub fn default_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(clamp_secs(self.default_window_secs))
    }

    pub fn reference_offset(&self) -> chrono::Duration {
        chrono::Duration::seconds(clamp_secs(self.reference_offset_secs))
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::v0()
    }
}

// chrono::Duration panics past i64::MAX milliseconds.
fn clamp_secs(secs: u64) -> i64 {
    const MAX_SECS: u64 = (i64::MAX / 1_000) as u64;
    secs.min(MAX_SECS) as i64
}
