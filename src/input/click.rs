//! Mouse click backends
//!
//! The click loop only needs "press and release button B once". Backends
//! implement [`Clicker`]; failures are reported as [`ClickError`] so the loop
//! can back off and retry instead of dying.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::MouseButton;

/// Capability to issue one click
pub trait Clicker: Send {
    /// Press and release `button` once
    fn click(&mut self, button: MouseButton) -> Result<(), ClickError>;
}

impl<F> Clicker for F
where
    F: FnMut(MouseButton) -> Result<(), ClickError> + Send,
{
    fn click(&mut self, button: MouseButton) -> Result<(), ClickError> {
        self(button)
    }
}

/// Clicker that only logs, for trying settings without touching the mouse
#[derive(Debug, Default, Clone)]
pub struct DryRunClicker {
    clicks: Arc<AtomicU64>,
}

impl DryRunClicker {
    /// Create a new dry-run clicker
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared click counter, readable after the clicker moved to the loop
    pub fn counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.clicks)
    }

    /// Clicks issued so far
    pub fn clicks(&self) -> u64 {
        self.clicks.load(Ordering::Relaxed)
    }
}

impl Clicker for DryRunClicker {
    fn click(&mut self, button: MouseButton) -> Result<(), ClickError> {
        let n = self.clicks.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("Click #{} ({})", n, button);
        Ok(())
    }
}

/// Real OS clicks through `enigo`
///
/// The `Enigo` handle is created lazily on the thread that clicks, since it
/// is not guaranteed to be `Send` on every platform.
#[cfg(feature = "desktop-input")]
#[derive(Debug, Default)]
pub struct EnigoClicker;

#[cfg(feature = "desktop-input")]
impl EnigoClicker {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "desktop-input")]
impl Clicker for EnigoClicker {
    fn click(&mut self, button: MouseButton) -> Result<(), ClickError> {
        use enigo::{Button, Direction, Enigo, Mouse, Settings};
        use std::cell::RefCell;

        thread_local! {
            static ENIGO: RefCell<Option<Enigo>> = const { RefCell::new(None) };
        }

        let button = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        };

        ENIGO.with(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_none() {
                let enigo = Enigo::new(&Settings::default())
                    .map_err(|e| ClickError::Unavailable(e.to_string()))?;
                *slot = Some(enigo);
            }

            match slot.as_mut() {
                Some(enigo) => enigo
                    .button(button, Direction::Click)
                    .map_err(|e| ClickError::Rejected(e.to_string())),
                None => Err(ClickError::Unavailable("input connection lost".to_string())),
            }
        })
    }
}

/// Failed click
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClickError {
    #[error("Input backend unavailable: {0}")]
    Unavailable(String),
    #[error("Click rejected: {0}")]
    Rejected(String),
}
