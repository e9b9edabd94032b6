//! Autoclicker - hotkey-toggled mouse clicking with humanized timing
//!
//! This library provides a background click engine that repeats single
//! clicks at a configurable rate, a delay model that randomizes the spacing
//! between clicks, and the settings and hotkey plumbing a front end needs.
//!
//! ## Humanization
//!
//! The `humanize` module spreads each inter-click delay uniformly around
//! the base delay so clicks do not land on a fixed beat.

pub mod config;
pub mod console;
pub mod engine;
pub mod humanize;
pub mod input;
pub mod panel;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::engine::{ClickEngine, EngineError};
use crate::input::{Clicker, HotkeyBinding};
use crate::panel::ControlPanel;

/// A running auto-clicker: engine, hotkey binding and settings panel
#[derive(Debug)]
pub struct AutoClicker {
    engine: Arc<ClickEngine>,
    hotkey: Arc<HotkeyBinding>,
    panel: ControlPanel,
}

impl AutoClicker {
    /// Start the click engine with the given configuration
    pub fn new<C: Clicker + 'static>(config: &AppConfig, clicker: C) -> Result<Self, EngineError> {
        let engine = Arc::new(ClickEngine::with_settings(config.engine, clicker)?);
        let hotkey = Arc::new(HotkeyBinding::new(config.hotkey()));
        let panel = ControlPanel::new(Arc::clone(&engine), Arc::clone(&hotkey));

        log::info!(
            "Auto-clicker ready: {} cps, {}% jitter, {} button, hotkey '{}'",
            config.engine.target_rate,
            config.engine.jitter_pct,
            config.engine.button,
            config.hotkey()
        );

        Ok(Self {
            engine,
            hotkey,
            panel,
        })
    }

    /// Key press from a keyboard listener
    ///
    /// Returns the new active state if the key was the hotkey.
    pub fn on_key_press(&self, key: char) -> Option<bool> {
        self.hotkey.handle_key(&self.engine, key)
    }

    /// Binding to hand to a keyboard listener running on another thread
    pub fn hotkey_binding(&self) -> Arc<HotkeyBinding> {
        Arc::clone(&self.hotkey)
    }

    pub fn engine(&self) -> &Arc<ClickEngine> {
        &self.engine
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ControlPanel {
        &mut self.panel
    }

    /// Current configuration, suitable for saving
    pub fn config(&self) -> AppConfig {
        AppConfig {
            engine: self.engine.settings(),
            hotkey: self.hotkey.current().as_char(),
        }
    }

    /// Stop the engine and wait for its loop to exit
    pub fn shutdown(&self, timeout: Duration) -> Result<(), EngineError> {
        self.engine.shutdown();
        self.engine.join(timeout)
    }
}
