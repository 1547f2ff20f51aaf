//! Rollover - Metrics
//!
//! Sink counters and periodic reporting.
//!
//! # Overview
//!
//! This crate provides:
//! - [`Counter`], a lock-free monotonic counter
//! - [`SinkCounter`], the per-sink counter set updated by the drain loop
//!   (connections created/closed/failed, events attempted/succeeded)
//! - [`SinkMetricsProvider`] so a sink can expose its counters
//! - [`SinkReporter`] which logs a snapshot at a fixed interval
//!
//! # Metrics Handle Pattern
//!
//! A sink owns an `Arc<SinkCounter>` and hands out a lightweight handle that
//! implements [`SinkMetricsProvider`]. The handle stays valid after the
//! sink is consumed by its driver.
//!
//! ```text
//! RollingFileSink (owns Arc<SinkCounter>)
//!     │
//!     ├──► metrics_handle() → Handle (clones Arc, implements provider)
//!     │
//!     └──► SinkRunner::run() [consumes sink, Arc keeps counters alive]
//! ```
//!
//! Counters are never global: each sink instance owns its own set.

pub mod format;
mod sink_reporter;
mod traits;

pub use format::{HumanFormatter, JsonFormatter, MetricsFormatter};
pub use sink_reporter::{SinkReporter, spawn_sink_reporters};
pub use traits::{SinkCounter, SinkCounterSnapshot, SinkMetricsConfig, SinkMetricsProvider};

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter wrapper for convenient metric operations
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Create a new counter initialized to 0
    #[inline]
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increment the counter by `val` (relaxed ordering for performance)
    #[inline]
    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    /// Increment the counter by 1
    #[inline]
    pub fn inc(&self) {
        self.add(1);
    }

    /// Get the current value (relaxed ordering)
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
