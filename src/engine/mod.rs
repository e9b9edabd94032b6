//! Click engine
//!
//! Owns the click settings and run state behind a single lock and drives
//! the background click loop. Every operation here only takes the lock, so
//! it is safe to call from a hotkey callback or a UI thread.

pub mod worker;

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{EngineSettings, SettingUpdate, SettingsError};
use crate::input::Clicker;

pub use worker::{CLICK_FAILURE_BACKOFF, IDLE_INTERVAL};

/// Longest time dropping an engine waits for its loop to exit
pub const DROP_JOIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Run state of the click loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineState {
    /// Whether the loop is issuing clicks
    pub active: bool,
    /// Whether the loop thread keeps running; never true again once false
    pub alive: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            active: false,
            alive: true,
        }
    }
}

/// Counters kept by the click loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Successful clicks
    pub clicks: u64,
    /// Clicks the backend reported as failed
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: EngineState,
    settings: EngineSettings,
    stats: EngineStats,
}

/// State shared with the loop thread
#[derive(Debug)]
struct Inner {
    shared: Mutex<Shared>,
    changed: Condvar,
}

impl Inner {
    /// Lock the shared state, recovering from a poisoned lock
    ///
    /// Everything behind the lock is plain data that is valid after any
    /// partial update, so a panic elsewhere never leaves it inconsistent.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep up to `timeout`, waking early on shutdown or when `active`
    /// stops matching
    fn wait(&self, timeout: Duration, active: bool) {
        let guard = self.lock();
        let (_guard, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |shared| {
                shared.state.alive && shared.state.active == active
            })
            .unwrap_or_else(PoisonError::into_inner);
    }
}

/// Background auto-clicker
///
/// The click loop starts on construction and runs until [`shutdown`] (or
/// drop). Clicking is switched on and off with [`start`], [`stop`] and
/// [`toggle`].
///
/// [`shutdown`]: ClickEngine::shutdown
/// [`start`]: ClickEngine::start
/// [`stop`]: ClickEngine::stop
/// [`toggle`]: ClickEngine::toggle
#[derive(Debug)]
pub struct ClickEngine {
    inner: Arc<Inner>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ClickEngine {
    /// Create an engine with default settings and start its loop thread
    pub fn new<C: Clicker + 'static>(clicker: C) -> Result<Self, EngineError> {
        Self::with_settings(EngineSettings::default(), clicker)
    }

    /// Create an engine with the given settings and start its loop thread
    pub fn with_settings<C: Clicker + 'static>(
        settings: EngineSettings,
        clicker: C,
    ) -> Result<Self, EngineError> {
        settings.validate()?;

        let inner = Arc::new(Inner {
            shared: Mutex::new(Shared {
                settings,
                ..Default::default()
            }),
            changed: Condvar::new(),
        });

        let loop_inner = Arc::clone(&inner);
        let handle = thread::Builder::new()
            .name("click-engine".to_string())
            .spawn(move || worker::run(loop_inner, clicker))?;

        Ok(Self {
            inner,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Start clicking
    pub fn start(&self) {
        let mut shared = self.inner.lock();
        if !shared.state.alive {
            log::warn!("Ignoring start: engine is shut down");
            return;
        }
        if shared.state.active {
            return;
        }
        shared.state.active = true;
        drop(shared);

        self.inner.changed.notify_all();
        log::info!("Clicking started");
    }

    /// Stop clicking
    pub fn stop(&self) {
        let mut shared = self.inner.lock();
        if !shared.state.active {
            return;
        }
        shared.state.active = false;
        drop(shared);

        self.inner.changed.notify_all();
        log::info!("Clicking stopped");
    }

    /// Flip clicking on or off, returning the new state
    ///
    /// After shutdown this does nothing and returns `false`.
    pub fn toggle(&self) -> bool {
        let mut shared = self.inner.lock();
        if !shared.state.alive {
            log::warn!("Ignoring toggle: engine is shut down");
            return false;
        }
        shared.state.active = !shared.state.active;
        let active = shared.state.active;
        drop(shared);

        self.inner.changed.notify_all();
        if active {
            log::info!("Clicking started");
        } else {
            log::info!("Clicking stopped");
        }

        active
    }

    /// Stop clicking and end the loop thread for good
    ///
    /// The loop observes this within one wait. Use [`join`](Self::join) to
    /// wait for it to exit.
    pub fn shutdown(&self) {
        let mut shared = self.inner.lock();
        if !shared.state.alive {
            return;
        }
        shared.state.active = false;
        shared.state.alive = false;
        drop(shared);

        self.inner.changed.notify_all();
        log::info!("Click engine shutting down");
    }

    /// Wait up to `timeout` for the loop thread to exit
    ///
    /// Does not shut the engine down by itself.
    pub fn join(&self, timeout: Duration) -> Result<(), EngineError> {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(handle) = slot.take() else {
            return Ok(());
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                *slot = Some(handle);
                return Err(EngineError::JoinTimeout(timeout));
            }
            thread::sleep(Duration::from_millis(5));
        }

        handle.join().map_err(|_| EngineError::LoopPanicked)
    }

    /// Validate and apply one settings change
    ///
    /// On error the settings are unchanged; callers holding their own copy
    /// should re-read [`settings`](Self::settings).
    pub fn update_settings(&self, update: SettingUpdate) -> Result<(), SettingsError> {
        let result = self.inner.lock().settings.apply(update);

        match &result {
            Ok(()) => log::debug!("Updated {}: {:?}", update.field(), update),
            Err(e) => log::warn!("Rejected settings update: {}", e),
        }

        result
    }

    /// Current settings
    pub fn settings(&self) -> EngineSettings {
        self.inner.lock().settings
    }

    /// Current run state
    pub fn state(&self) -> EngineState {
        self.inner.lock().state
    }

    /// Whether clicking is on
    pub fn is_active(&self) -> bool {
        self.state().active
    }

    /// Whether the loop is still running
    pub fn is_alive(&self) -> bool {
        self.state().alive
    }

    /// Click counters
    pub fn stats(&self) -> EngineStats {
        self.inner.lock().stats
    }
}

impl Drop for ClickEngine {
    /// Shut down and wait up to [`DROP_JOIN_TIMEOUT`] for the loop
    ///
    /// A loop stuck in the click backend is left detached; it only holds
    /// the shared state and exits once the backend returns.
    fn drop(&mut self) {
        self.shutdown();

        match self.join(DROP_JOIN_TIMEOUT) {
            Ok(()) => {}
            Err(EngineError::JoinTimeout(_)) => {
                log::warn!("Click loop still busy after {:?}, detaching it", DROP_JOIN_TIMEOUT);
            }
            Err(e) => log::error!("{}", e),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to spawn click loop: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("Click loop did not exit within {0:?}")]
    JoinTimeout(Duration),
    #[error("Click loop panicked")]
    LoopPanicked,
}
