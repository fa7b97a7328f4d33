//! Configuration system for BuildForge.
//!
//! Load optimizer configuration from TOML or YAML files to tune the
//! search loop without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use buildforge_config::OptimizerConfig;
//! use std::time::Duration;
//!
//! let config = OptimizerConfig::from_toml_str(r#"
//!     compaction_threshold = 2000
//!     progress_interval = 50000
//!
//!     [pruning]
//!     enabled = false
//!
//!     [termination]
//!     seconds_spent_limit = 30
//! "#).unwrap();
//!
//! assert_eq!(config.compaction_threshold, 2000);
//! assert!(!config.pruning.enabled);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use buildforge_config::OptimizerConfig;
//!
//! let config = OptimizerConfig::load("optimizer.toml").unwrap_or_default();
//! assert_eq!(config.progress_interval, 10_000);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of buffered builds that triggers a compaction.
pub const DEFAULT_COMPACTION_THRESHOLD: usize = 1000;

/// Default number of combinations between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main optimizer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OptimizerConfig {
    /// Buffered build count that triggers sort-and-truncate.
    #[serde(default = "default_compaction_threshold")]
    pub compaction_threshold: usize,

    /// Combinations between progress reports and termination checks.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Candidate pruning configuration.
    #[serde(default)]
    pub pruning: PruningConfig,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,
}

fn default_compaction_threshold() -> usize {
    DEFAULT_COMPACTION_THRESHOLD
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            compaction_threshold: DEFAULT_COMPACTION_THRESHOLD,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            pruning: PruningConfig::default(),
            termination: None,
        }
    }
}

impl OptimizerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.compaction_threshold == 0 {
            return Err(ConfigError::Invalid(
                "compaction_threshold must be positive".to_string(),
            ));
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::Invalid(
                "progress_interval must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Sets the compaction threshold.
    pub fn with_compaction_threshold(mut self, threshold: usize) -> Self {
        self.compaction_threshold = threshold.max(1);
        self
    }

    /// Sets the progress interval.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Enables or disables candidate pruning.
    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.pruning.enabled = enabled;
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }
}

/// Candidate pruning configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PruningConfig {
    /// Whether dominated candidates may be dropped before enumeration.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend searching.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend searching.
    pub minutes_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests;
