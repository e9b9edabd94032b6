//! Settings panel model
//!
//! Holds the values a settings window displays and pushes them into the
//! engine. When the engine rejects a value the panel re-reads the engine's
//! settings so the display never drifts from what the loop actually uses.

use std::sync::Arc;

use crate::config::{EngineSettings, MouseButton};
use crate::engine::ClickEngine;
use crate::input::{Hotkey, HotkeyBinding, HotkeyError};

/// View model behind the settings window
#[derive(Debug)]
pub struct ControlPanel {
    engine: Arc<ClickEngine>,
    hotkey: Arc<HotkeyBinding>,
    /// Displayed click rate
    target_rate: f64,
    /// Displayed jitter percentage
    jitter_pct: f64,
    /// Selected button
    button: MouseButton,
}

impl ControlPanel {
    /// Create a panel showing the engine's current settings
    pub fn new(engine: Arc<ClickEngine>, hotkey: Arc<HotkeyBinding>) -> Self {
        let settings = engine.settings();
        Self {
            engine,
            hotkey,
            target_rate: settings.target_rate,
            jitter_pct: settings.jitter_pct,
            button: settings.button,
        }
    }

    /// Rate slider moved
    pub fn set_target_rate(&mut self, rate: f64) -> bool {
        self.target_rate = rate;
        self.push_settings()
    }

    /// Jitter slider moved
    pub fn set_jitter_pct(&mut self, pct: f64) -> bool {
        self.jitter_pct = pct;
        self.push_settings()
    }

    /// Button menu changed
    pub fn set_button(&mut self, button: MouseButton) -> bool {
        self.button = button;
        self.push_settings()
    }

    /// Send every displayed value to the engine
    ///
    /// All fields are pushed even if an earlier one is rejected. Afterwards
    /// the display is reset to the engine's settings, which on a rejection
    /// still hold the previous value.
    pub fn push_settings(&mut self) -> bool {
        let mut success = true;
        for update in self.settings().as_updates() {
            success &= self.engine.update_settings(update).is_ok();
        }

        self.refresh();
        success
    }

    /// Re-read the engine's settings into the display
    pub fn refresh(&mut self) {
        let settings = self.engine.settings();
        self.target_rate = settings.target_rate;
        self.jitter_pct = settings.jitter_pct;
        self.button = settings.button;
    }

    /// Hotkey field submitted
    pub fn set_hotkey(&mut self, input: &str) -> Result<Hotkey, HotkeyError> {
        self.hotkey.rebind(input).inspect_err(|e| {
            log::warn!("Keeping hotkey '{}': {}", self.hotkey.current(), e);
        })
    }

    /// Start/stop button pressed
    ///
    /// The panel keeps no copy of the run state: the hotkey can flip it
    /// from another thread, so [`is_active`](Self::is_active) and the
    /// labels always read it from the engine.
    pub fn toggle(&self) -> bool {
        self.engine.toggle()
    }

    pub fn start(&self) {
        self.engine.start();
    }

    pub fn stop(&self) {
        self.engine.stop();
    }

    /// Displayed settings
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            target_rate: self.target_rate,
            jitter_pct: self.jitter_pct,
            button: self.button,
        }
    }

    pub fn hotkey(&self) -> Hotkey {
        self.hotkey.current()
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    /// Rate next to the slider, e.g. `10.0`
    pub fn rate_label(&self) -> String {
        format!("{:.1}", self.target_rate)
    }

    /// Jitter next to the slider, e.g. `20%`
    pub fn jitter_label(&self) -> String {
        format!("{:.0}%", self.jitter_pct)
    }

    /// Caption of the start/stop button
    pub fn toggle_label(&self) -> String {
        let action = if self.is_active() { "STOP" } else { "START" };
        format!("{} (Hotkey: {})", action, self.hotkey())
    }

    /// Status bar text
    pub fn status_line(&self) -> &'static str {
        if self.is_active() {
            "Status: ACTIVE, clicking..."
        } else {
            "Status: INACTIVE"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingUpdate;
    use crate::input::DryRunClicker;

    fn panel() -> ControlPanel {
        let engine = Arc::new(ClickEngine::new(DryRunClicker::new()).unwrap());
        ControlPanel::new(engine, Arc::new(HotkeyBinding::default()))
    }

    #[test]
    fn test_initial_labels() {
        let panel = panel();
        assert_eq!(panel.rate_label(), "10.0");
        assert_eq!(panel.jitter_label(), "20%");
        assert_eq!(panel.toggle_label(), "START (Hotkey: S)");
        assert_eq!(panel.status_line(), "Status: INACTIVE");
    }

    #[test]
    fn test_valid_change_reaches_engine() {
        let mut panel = panel();

        assert!(panel.set_target_rate(42.5));
        assert!(panel.set_button(MouseButton::Middle));

        let settings = panel.engine.settings();
        assert_eq!(settings.target_rate, 42.5);
        assert_eq!(settings.button, MouseButton::Middle);
        assert_eq!(panel.settings(), settings);
    }

    #[test]
    fn test_rejected_change_resyncs_display() {
        let mut panel = panel();
        panel.set_jitter_pct(35.0);

        assert!(!panel.set_target_rate(0.5));

        assert_eq!(panel.settings().target_rate, 10.0);
        assert_eq!(panel.settings().jitter_pct, 35.0);
        assert_eq!(panel.rate_label(), "10.0");
    }

    #[test]
    fn test_toggle_updates_labels() {
        let panel = panel();

        assert!(panel.toggle());
        assert_eq!(panel.toggle_label(), "STOP (Hotkey: S)");
        assert_eq!(panel.status_line(), "Status: ACTIVE, clicking...");

        assert!(!panel.toggle());
        assert_eq!(panel.toggle_label(), "START (Hotkey: S)");
    }

    #[test]
    fn test_hotkey_change() {
        let mut panel = panel();

        assert!(panel.set_hotkey("x y").is_err());
        assert_eq!(panel.hotkey().as_char(), 's');

        panel.set_hotkey("d").unwrap();
        assert_eq!(panel.toggle_label(), "START (Hotkey: D)");
    }

    #[test]
    fn test_refresh_picks_up_external_changes() {
        let mut panel = panel();

        panel
            .engine
            .update_settings(SettingUpdate::JitterPct(0.0))
            .unwrap();
        assert_eq!(panel.settings().jitter_pct, 20.0);

        panel.refresh();
        assert_eq!(panel.jitter_label(), "0%");
    }

    #[test]
    fn test_negative_zero_jitter_shows_zero() {
        let mut panel = panel();

        assert!(panel.set_jitter_pct(-0.0));
        assert_eq!(panel.jitter_label(), "0%");
        assert!(panel.engine.settings().jitter_pct.is_sign_positive());
    }

    #[test]
    fn test_hotkey_toggle_shows_in_panel() {
        let engine = Arc::new(ClickEngine::new(DryRunClicker::new()).unwrap());
        let binding = Arc::new(HotkeyBinding::default());
        let panel = ControlPanel::new(Arc::clone(&engine), Arc::clone(&binding));

        let listener = {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || binding.handle_key(&engine, 's'))
        };
        assert_eq!(listener.join().unwrap(), Some(true));

        assert!(panel.is_active());
        assert_eq!(panel.toggle_label(), "STOP (Hotkey: S)");

        panel.stop();
        assert!(!engine.is_active());
        assert_eq!(panel.status_line(), "Status: INACTIVE");
    }
}
