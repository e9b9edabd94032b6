//! Configuration module
//!
//! Handles click settings, their valid ranges, and the startup config file.

pub mod file;
pub mod settings;

pub use file::{AppConfig, ConfigError};
pub use settings::{EngineSettings, MouseButton, SettingUpdate, SettingsError};
