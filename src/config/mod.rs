//! Configuration management for the clipboard history.
//!
//! Settings are read from a JSON document under the `"clip-history"` key
//! and merged with defaults. The resulting [`ClipHistoryConfig`] is a plain
//! value: callers own it and pass it to whatever needs it.

pub mod schema;

pub use schema::{ClipHistoryConfig, ConfigError};

use crate::history::storage::APP_DIR_NAME;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key under which settings are looked up.
pub const SETTINGS_KEY: &str = "clip-history";

/// File name of the settings file in the config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Gets the default settings file path, `<config_dir>/clip-history/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads configuration from a JSON value.
///
/// Reads the `"clip-history"` settings and fills in defaults for anything
/// missing. Settings that cannot be parsed are logged and replaced by the
/// defaults; settings that parse but are out of range are an error.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing user settings under the
///   `"clip-history"` key
///
/// # Example
///
/// ```
/// use clip_history::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "clip-history": {
///         "maxEntries": 250,
///         "maxAgeDays": 30
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.max_entries, 250);
/// assert_eq!(config.poll_interval_ms, 500);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<ClipHistoryConfig, ConfigError> {
    let mut config = ClipHistoryConfig::default();

    if let Some(settings) = settings_json.as_ref().and_then(|s| s.get(SETTINGS_KEY)) {
        match serde_json::from_value::<ClipHistoryConfig>(settings.clone()) {
            Ok(user_config) => config = user_config,
            Err(err) => {
                log::warn!(
                    "Failed to parse {} settings: {}. Using defaults.",
                    SETTINGS_KEY,
                    err
                );
            }
        }
    }

    config.validate()?;
    Ok(config)
}

/// Loads configuration from a JSON settings file.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file exists but cannot be read,
/// `ConfigError::Parse` if it is not JSON, and `ConfigError::Invalid` for
/// out-of-range values.
pub fn load_config_file(path: &Path) -> Result<ClipHistoryConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            log::debug!("No settings file at {}, using defaults", path.display());
            return load_config(None);
        }
        Err(err) => return Err(err.into()),
    };

    let settings: Value = serde_json::from_str(&raw)?;
    load_config(Some(settings))
}
