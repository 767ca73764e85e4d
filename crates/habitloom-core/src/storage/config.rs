//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Suggestion adapter endpoint and credentials
//! - Default duration for imported calendar events
//!
//! Configuration is stored at `~/.config/habitloom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Suggestion adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Endpoint to POST prompts to. Unset means the canned fallback is used.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Environment variable holding the bearer token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Calendar import configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Duration assigned to all-day events, in minutes
    #[serde(default = "default_all_day_minutes")]
    pub all_day_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitloom/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub suggestion: SuggestionConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

fn default_api_key_env() -> String {
    "HABITLOOM_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_all_day_minutes() -> u32 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            enabled: default_true(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            all_day_minutes: default_all_day_minutes(),
        }
    }
}

impl Config {
    fn path() -> Option<PathBuf> {
        data_dir().ok().map(|d| d.join("config.toml"))
    }

    /// Load configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                log::warn!("invalid config at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist configuration to disk.
    ///
    /// # Errors
    /// Returns an error if the config directory is unavailable or the
    /// file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().ok_or_else(|| ConfigError::SaveFailed {
            path: PathBuf::from("config.toml"),
            message: "config directory unavailable".to_string(),
        })?;
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, text).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a single value by dotted key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "suggestion.api_url" => Some(self.suggestion.api_url.clone().unwrap_or_default()),
            "suggestion.api_key_env" => Some(self.suggestion.api_key_env.clone()),
            "suggestion.timeout_secs" => Some(self.suggestion.timeout_secs.to_string()),
            "suggestion.enabled" => Some(self.suggestion.enabled.to_string()),
            "import.all_day_minutes" => Some(self.import.all_day_minutes.to_string()),
            _ => None,
        }
    }

    /// Set a single value by dotted key.
    ///
    /// # Errors
    /// Returns an error for unknown keys or unparseable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        match key {
            "suggestion.api_url" => {
                self.suggestion.api_url = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "suggestion.api_key_env" => self.suggestion.api_key_env = value.to_string(),
            "suggestion.timeout_secs" => {
                self.suggestion.timeout_secs =
                    value.parse().map_err(|_| invalid("expected seconds".to_string()))?;
            }
            "suggestion.enabled" => {
                self.suggestion.enabled =
                    value.parse().map_err(|_| invalid("expected true/false".to_string()))?;
            }
            "import.all_day_minutes" => {
                self.import.all_day_minutes =
                    value.parse().map_err(|_| invalid("expected minutes".to_string()))?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }
}
