//! Sink counters and the provider trait
//!
//! The drain loop only ever writes to these counters; the reporter only
//! reads snapshots. All fields are atomics, so no locks are needed.

use std::time::Duration;

use crate::Counter;

/// Counters updated by a rolling file sink
///
/// Monotonically increasing; they reset only when the process restarts.
#[derive(Debug, Default)]
pub struct SinkCounter {
    /// Output streams opened
    pub connection_created: Counter,
    /// Output streams closed (rotation or shutdown)
    pub connection_closed: Counter,
    /// Failures opening, flushing or closing a stream
    pub connection_failed: Counter,
    /// Batches that found the channel empty
    pub batch_empty: Counter,
    /// Batches that ended early because the channel ran dry
    pub batch_underflow: Counter,
    /// Batches that reached the configured batch size
    pub batch_complete: Counter,
    /// Events taken from the channel and handed to the serializer
    pub event_drain_attempt: Counter,
    /// Events whose enclosing transaction committed
    pub event_drain_success: Counter,
}

impl SinkCounter {
    /// Create new counters with all values at zero
    pub const fn new() -> Self {
        Self {
            connection_created: Counter::new(),
            connection_closed: Counter::new(),
            connection_failed: Counter::new(),
            batch_empty: Counter::new(),
            batch_underflow: Counter::new(),
            batch_complete: Counter::new(),
            event_drain_attempt: Counter::new(),
            event_drain_success: Counter::new(),
        }
    }

    #[inline]
    pub fn inc_connection_created(&self) {
        self.connection_created.inc();
    }

    #[inline]
    pub fn inc_connection_closed(&self) {
        self.connection_closed.inc();
    }

    #[inline]
    pub fn inc_connection_failed(&self) {
        self.connection_failed.inc();
    }

    #[inline]
    pub fn inc_event_drain_attempt(&self) {
        self.event_drain_attempt.inc();
    }

    /// Add a committed batch to the success count
    #[inline]
    pub fn add_event_drain_success(&self, events: u64) {
        self.event_drain_success.add(events);
    }

    /// Classify a finished batch by how many events it drained
    #[inline]
    pub fn record_batch(&self, drained: usize, batch_size: usize) {
        if drained == 0 {
            self.batch_empty.inc();
        } else if drained < batch_size {
            self.batch_underflow.inc();
        } else {
            self.batch_complete.inc();
        }
    }

    /// Take a snapshot of current values
    pub fn snapshot(&self) -> SinkCounterSnapshot {
        SinkCounterSnapshot {
            connection_created: self.connection_created.get(),
            connection_closed: self.connection_closed.get(),
            connection_failed: self.connection_failed.get(),
            batch_empty: self.batch_empty.get(),
            batch_underflow: self.batch_underflow.get(),
            batch_complete: self.batch_complete.get(),
            event_drain_attempt: self.event_drain_attempt.get(),
            event_drain_success: self.event_drain_success.get(),
        }
    }
}

/// Point-in-time snapshot of sink counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SinkCounterSnapshot {
    pub connection_created: u64,
    pub connection_closed: u64,
    pub connection_failed: u64,
    pub batch_empty: u64,
    pub batch_underflow: u64,
    pub batch_complete: u64,
    pub event_drain_attempt: u64,
    pub event_drain_success: u64,
}

/// Per-sink metrics reporting configuration
#[derive(Debug, Clone, Copy)]
pub struct SinkMetricsConfig {
    /// Whether periodic reporting is enabled
    pub enabled: bool,
    /// Reporting interval for this sink
    pub interval: Duration,
}

impl Default for SinkMetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60),
        }
    }
}

/// Trait for sinks to provide counters to the reporter
pub trait SinkMetricsProvider: Send + Sync {
    /// Unique identifier for this sink instance
    fn sink_id(&self) -> &str;

    /// Sink type (e.g., "rolling_file")
    fn sink_type(&self) -> &str;

    /// Get per-sink metrics configuration
    fn metrics_config(&self) -> SinkMetricsConfig;

    /// Get a snapshot of current counters
    fn snapshot(&self) -> SinkCounterSnapshot;
}
