//! Rate-limited failure logging
//!
//! A sink retrying against a full disk fails on every invocation. This
//! logger emits at most one error per interval and reports how many
//! failures were suppressed in between.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default interval between logged failures
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Logs at most once per interval for one sink
pub struct RateLimitedLogger {
    sink: String,
    min_interval: Duration,
    last_log_time: Mutex<Option<Instant>>,
    /// Failures since the last logged one
    pending: AtomicU64,
    total: AtomicU64,
}

impl RateLimitedLogger {
    pub fn new(sink: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            sink: sink.into(),
            min_interval,
            last_log_time: Mutex::new(None),
            pending: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Record a failure; returns true if it was logged
    pub fn error(&self, message: &str, error: &dyn std::error::Error) -> bool {
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);

        let should_log = {
            let mut last = self.last_log_time.lock();
            let now = Instant::now();
            match *last {
                Some(at) if now.duration_since(at) < self.min_interval => false,
                _ => {
                    *last = Some(now);
                    true
                }
            }
        };

        if !should_log {
            return false;
        }

        let count = self.pending.swap(0, Ordering::Relaxed);
        let total = self.total.load(Ordering::Relaxed);
        let cause = error.source().map(ToString::to_string).unwrap_or_default();
        tracing::error!(
            sink = %self.sink,
            error = %error,
            cause = %cause,
            suppressed = count.saturating_sub(1),
            total_failures = total,
            "{message}"
        );
        true
    }

    /// Failures recorded since the last logged one
    pub fn pending_count(&self) -> u64 {
        self.pending.load(Ordering::Relaxed)
    }

    /// All failures recorded
    pub fn total_count(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
