//! Configuration schema for the clipboard history.
//!
//! This module defines the configuration structure and validation logic for
//! all user-configurable settings.

use crate::clipboard::DEFAULT_POLL_INTERVAL;
use crate::history::{
    default_history_path, HistoryError, RetentionPolicy, DEFAULT_PREVIEW_LENGTH,
};
use crate::history::store::{DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_ENTRIES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main configuration structure.
///
/// Every field has a default, so a settings file only needs to list the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipHistoryConfig {
    /// Maximum number of entries kept in the history.
    ///
    /// Favorites may push the history past this limit. Defaults to 100.
    ///
    /// Must be > 0.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Number of days a non-favorite entry is kept. Defaults to 7.
    ///
    /// Must be > 0.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Location of the history file.
    ///
    /// Defaults to `<data_local_dir>/clip-history/history.json`.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Delay between two clipboard reads, in milliseconds. Defaults to 500.
    ///
    /// Must be > 0.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Number of characters shown in list previews. Defaults to 80.
    ///
    /// Must be > 3.
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
}

impl Default for ClipHistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_age_days: default_max_age_days(),
            history_file: None,
            poll_interval_ms: default_poll_interval_ms(),
            preview_length: default_preview_length(),
        }
    }
}

impl ClipHistoryConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "maxEntries must be greater than 0".to_string(),
            ));
        }

        if self.max_age_days == 0 {
            return Err(ConfigError::Invalid(
                "maxAgeDays must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "pollIntervalMs must be greater than 0".to_string(),
            ));
        }

        if self.preview_length <= 3 {
            return Err(ConfigError::Invalid(
                "previewLength must be greater than 3".to_string(),
            ));
        }

        Ok(())
    }

    /// Count and age limits for the history store.
    pub fn retention_policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_entries: self.max_entries,
            max_age: chrono::Duration::days(i64::from(self.max_age_days)),
        }
    }

    /// Returns the poll interval as a `std::time::Duration`.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Resolves the history file location.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StoragePathUnavailable` when no file is
    /// configured and the platform has no data directory.
    pub fn history_path(&self) -> Result<PathBuf, HistoryError> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => default_history_path(),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("Could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON.
    #[error("Could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting has an invalid value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_max_age_days() -> u32 {
    DEFAULT_MAX_AGE_DAYS as u32
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_preview_length() -> usize {
    DEFAULT_PREVIEW_LENGTH
}
