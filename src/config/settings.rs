//! Click engine settings
//!
//! Defines the user-adjustable click settings, their valid ranges, and the
//! validated update operation the engine applies under its lock.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default click rate (clicks per second)
pub const DEFAULT_CPS: f64 = 10.0;
/// Default timing jitter (percent of the base delay)
pub const DEFAULT_JITTER_PCT: f64 = 20.0;
/// Default hotkey letter
pub const DEFAULT_HOTKEY: char = 's';

/// Valid click rate range
pub const CPS_MIN: f64 = 1.0;
pub const CPS_MAX: f64 = 200.0;

/// Valid jitter range
pub const JITTER_MIN: f64 = 0.0;
pub const JITTER_MAX: f64 = 100.0;

/// Mouse button to click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Primary button
    #[default]
    Left,
    /// Secondary button
    Right,
    /// Wheel button
    Middle,
}

impl MouseButton {
    /// All selectable buttons, in menu order
    pub const ALL: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    /// Name used in configuration files and commands
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MouseButton {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "primary" => Ok(MouseButton::Left),
            "right" | "secondary" => Ok(MouseButton::Right),
            "middle" => Ok(MouseButton::Middle),
            _ => Err(SettingsError::InvalidButton(s.to_string())),
        }
    }
}

/// Settings read by the click loop on every iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Target clicks per second
    pub target_rate: f64,
    /// Random variation of each delay, as a percentage of the base delay
    pub jitter_pct: f64,
    /// Button to click
    pub button: MouseButton,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            target_rate: DEFAULT_CPS,
            jitter_pct: DEFAULT_JITTER_PCT,
            button: MouseButton::Left,
        }
    }
}

impl EngineSettings {
    /// Apply a single update, leaving `self` untouched if it is out of range
    pub fn apply(&mut self, update: SettingUpdate) -> Result<(), SettingsError> {
        update.validate()?;

        match update {
            SettingUpdate::TargetRate(rate) => self.target_rate = rate,
            // Adding zero turns -0.0 into 0.0
            SettingUpdate::JitterPct(pct) => self.jitter_pct = pct + 0.0,
            SettingUpdate::Button(button) => self.button = button,
        }

        Ok(())
    }

    /// Check every field against its range
    pub fn validate(&self) -> Result<(), SettingsError> {
        SettingUpdate::TargetRate(self.target_rate).validate()?;
        SettingUpdate::JitterPct(self.jitter_pct).validate()?;
        Ok(())
    }

    /// The updates that would turn any settings into these ones
    pub fn as_updates(&self) -> [SettingUpdate; 3] {
        [
            SettingUpdate::TargetRate(self.target_rate),
            SettingUpdate::JitterPct(self.jitter_pct),
            SettingUpdate::Button(self.button),
        ]
    }
}

/// A change to one engine setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingUpdate {
    TargetRate(f64),
    JitterPct(f64),
    Button(MouseButton),
}

impl SettingUpdate {
    /// Build an update from a field name and its textual value
    ///
    /// Accepts `target_rate`/`cps`, `jitter_pct`/`jitter`, and `button`.
    pub fn parse(field: &str, value: &str) -> Result<Self, SettingsError> {
        let number = |field: &str| {
            value
                .trim()
                .trim_end_matches('%')
                .parse::<f64>()
                .map_err(|_| SettingsError::InvalidNumber {
                    field: field.to_string(),
                    value: value.to_string(),
                })
        };

        match field.trim().to_ascii_lowercase().as_str() {
            "target_rate" | "cps" => Ok(SettingUpdate::TargetRate(number("target_rate")?)),
            "jitter_pct" | "jitter" => Ok(SettingUpdate::JitterPct(number("jitter_pct")?)),
            "button" => Ok(SettingUpdate::Button(value.parse()?)),
            other => Err(SettingsError::UnknownField(other.to_string())),
        }
    }

    /// Check the value against its field's range
    ///
    /// NaN never lies in a range, so it is always rejected.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match *self {
            SettingUpdate::TargetRate(rate) if !(CPS_MIN..=CPS_MAX).contains(&rate) => {
                Err(SettingsError::TargetRateOutOfRange(rate))
            }
            SettingUpdate::JitterPct(pct) if !(JITTER_MIN..=JITTER_MAX).contains(&pct) => {
                Err(SettingsError::JitterOutOfRange(pct))
            }
            _ => Ok(()),
        }
    }

    /// Field name as used by [`SettingUpdate::parse`]
    pub fn field(&self) -> &'static str {
        match self {
            SettingUpdate::TargetRate(_) => "target_rate",
            SettingUpdate::JitterPct(_) => "jitter_pct",
            SettingUpdate::Button(_) => "button",
        }
    }
}

/// Rejected settings update
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("target rate must be between {min} and {max} clicks/s, got {0}", min = CPS_MIN, max = CPS_MAX)]
    TargetRateOutOfRange(f64),
    #[error("jitter must be between {min}% and {max}%, got {0}", min = JITTER_MIN, max = JITTER_MAX)]
    JitterOutOfRange(f64),
    #[error("button must be one of left, right, middle, got {0:?}")]
    InvalidButton(String),
    #[error("unknown setting: {0}")]
    UnknownField(String),
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },
}
