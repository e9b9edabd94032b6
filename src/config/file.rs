//! Application configuration file
//!
//! JSON configuration loaded once at startup. Every field is optional;
//! missing fields take their defaults and present fields are validated.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::settings::{EngineSettings, SettingsError, DEFAULT_HOTKEY};
use crate::input::hotkey::{Hotkey, HotkeyError};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial click settings
    pub engine: EngineSettings,
    /// Toggle hotkey letter
    pub hotkey: char,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            hotkey: DEFAULT_HOTKEY,
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = serde_json::from_str(json)?;
        config.engine.validate()?;
        config.hotkey = Hotkey::new(config.hotkey)?.as_char();
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load a configuration file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// The configured hotkey
    pub fn hotkey(&self) -> Hotkey {
        Hotkey::new(self.hotkey).unwrap_or_default()
    }

    /// Render as pretty-printed JSON
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid engine settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Invalid hotkey: {0}")]
    Hotkey(#[from] HotkeyError),
}
