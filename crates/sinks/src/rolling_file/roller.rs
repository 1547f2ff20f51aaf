//! Rotation timer
//!
//! The timer never touches the file. Each tick only raises the shared
//! `should_rotate` flag; the drain loop performs the rotation on its next
//! invocation, between batches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// How long `shutdown()` waits per poll for the timer task to finish
const SHUTDOWN_POLL: Duration = Duration::from_secs(1);

/// Background task that periodically requests a rotation
pub struct Roller {
    name: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Roller {
    /// Start ticking every `period`; the first tick fires after one period
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(name: impl Into<String>, period: Duration, should_rotate: Arc<AtomicBool>) -> Self {
        let name = name.into();
        let cancel = CancellationToken::new();

        let task_name = name.clone();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(sink = %task_name, "marking time to rotate file");
                        should_rotate.store(true, Ordering::Release);
                    }
                }
            }
        });

        Self {
            name,
            cancel,
            handle,
        }
    }

    /// Stop the timer and wait until its task has terminated
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        loop {
            match timeout(SHUTDOWN_POLL, &mut self.handle).await {
                Ok(_) => break,
                Err(_) => {
                    debug!(sink = %self.name, "waiting for roll timer to terminate");
                }
            }
        }
    }
}
