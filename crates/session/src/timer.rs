//! Session countdown timer
//!
//! One spawned task per session: it emits a `Tick` every second, starting
//! immediately with the full remaining time, and ends the session once the
//! zero tick has been emitted. Resetting a session aborts the running task
//! before a fresh one is spawned, so at most one countdown is ever live.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::controller::SharedState;
use crate::event::{EndReason, SessionEvent};

/// Default session length in seconds (five minutes)
pub const SESSION_SECONDS: u64 = 300;

/// Handle to a live countdown task.
///
/// Aborting stops ticking immediately; the task emits nothing after abort.
#[derive(Debug)]
pub(crate) struct CountdownHandle {
    handle: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop the countdown with no further emissions
    pub(crate) fn abort(&self) {
        self.handle.abort();
    }
}

/// Spawn a countdown of `seconds` for the current session.
///
/// Tick sequence: `seconds`, `seconds - 1`, …, 0. After the zero tick the
/// task ends the session (exactly one `SessionEnded { Expired }`) and stops.
pub(crate) fn start_countdown(shared: Arc<SharedState>, seconds: u64) -> CountdownHandle {
    let handle = tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(1));
        let mut remaining = seconds;

        loop {
            // First tick completes immediately, like the original which
            // renders the full time before the one-second cadence starts.
            interval.tick().await;
            shared.emit(SessionEvent::tick(remaining));

            if remaining == 0 {
                tracing::info!("session countdown expired");
                shared.end_session(EndReason::Expired).await;
                return;
            }
            remaining -= 1;
        }
    });

    CountdownHandle { handle }
}
