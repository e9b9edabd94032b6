//! Background click loop
//!
//! Runs on the engine's own thread. Each iteration snapshots the state and
//! settings under the lock, then clicks and waits with the lock released.

use std::sync::Arc;
use std::time::Duration;

use super::Inner;
use crate::humanize::Humanizer;
use crate::input::Clicker;

/// Poll interval while not clicking
pub const IDLE_INTERVAL: Duration = Duration::from_millis(50);

/// Pause after a failed click before trying again
pub const CLICK_FAILURE_BACKOFF: Duration = Duration::from_millis(100);

/// Loop body; returns once the engine is shut down
pub(super) fn run<C: Clicker>(inner: Arc<Inner>, mut clicker: C) {
    log::info!("Click loop started");

    let mut humanizer = Humanizer::new();

    loop {
        let (state, settings) = {
            let shared = inner.lock();
            (shared.state, shared.settings)
        };

        if !state.alive {
            break;
        }

        if !state.active {
            inner.wait(IDLE_INTERVAL, false);
            continue;
        }

        match clicker.click(settings.button) {
            Ok(()) => {
                inner.lock().stats.clicks += 1;
                let delay = humanizer.next_delay(&settings);
                inner.wait(delay, true);
            }
            Err(e) => {
                log::warn!("Click failed: {}", e);
                inner.lock().stats.failures += 1;
                inner.wait(CLICK_FAILURE_BACKOFF, true);
            }
        }
    }

    log::info!("Click loop exited");
}
