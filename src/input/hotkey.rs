//! Toggle hotkey
//!
//! The OS keyboard hook lives outside this crate; whatever listens for key
//! presses hands each character to [`HotkeyBinding::handle_key`], which
//! toggles the engine when it matches the bound letter.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::config::settings::DEFAULT_HOTKEY;
use crate::engine::ClickEngine;

/// A single-letter hotkey, stored lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey(char);

impl Hotkey {
    /// Create a hotkey from a letter
    pub fn new(key: char) -> Result<Self, HotkeyError> {
        if !key.is_alphabetic() {
            return Err(HotkeyError::NotALetter(key));
        }

        let mut lower = key.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(c), None) => Ok(Self(c)),
            _ => Err(HotkeyError::NotALetter(key)),
        }
    }

    /// Parse user input: exactly one letter, surrounding whitespace ignored
    pub fn parse(input: &str) -> Result<Self, HotkeyError> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();

        match (chars.next(), chars.next()) {
            (None, _) => Err(HotkeyError::Empty),
            (Some(c), None) => Self::new(c),
            (Some(_), Some(_)) => Err(HotkeyError::TooLong(trimmed.to_string())),
        }
    }

    /// The lowercase letter
    pub fn as_char(&self) -> char {
        self.0
    }

    /// Whether a pressed key triggers this hotkey (case-insensitive)
    pub fn matches(&self, key: char) -> bool {
        key == self.0 || key.to_lowercase().eq(std::iter::once(self.0))
    }
}

impl Default for Hotkey {
    fn default() -> Self {
        Self(DEFAULT_HOTKEY)
    }
}

/// Uppercase form, as shown on buttons
impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.to_uppercase() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Hotkey shared between the key listener and the settings surface
#[derive(Debug, Default)]
pub struct HotkeyBinding {
    key: RwLock<Hotkey>,
}

impl HotkeyBinding {
    /// Create a binding for `hotkey`
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            key: RwLock::new(hotkey),
        }
    }

    /// Currently bound key
    pub fn current(&self) -> Hotkey {
        *self.key.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a new key from user input, keeping the old one on error
    pub fn rebind(&self, input: &str) -> Result<Hotkey, HotkeyError> {
        let hotkey = Hotkey::parse(input)?;
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = hotkey;
        log::info!("Hotkey changed to '{}'", hotkey);
        Ok(hotkey)
    }

    /// Toggle the engine if `key` is the bound hotkey
    ///
    /// Returns the engine's new active state, or `None` if the key did not
    /// match.
    pub fn handle_key(&self, engine: &ClickEngine, key: char) -> Option<bool> {
        if self.current().matches(key) {
            Some(engine.toggle())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey is empty")]
    Empty,
    #[error("hotkey must be a single letter, got {0:?}")]
    TooLong(String),
    #[error("hotkey must be a letter, got {0:?}")]
    NotALetter(char),
}
