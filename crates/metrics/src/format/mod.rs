//! Metrics output formatters
//!
//! Formats sink counter snapshots for human-readable or JSON output.

mod human;
mod json;

pub use human::HumanFormatter;
pub use json::JsonFormatter;

use crate::SinkCounterSnapshot;

/// Trait for metrics formatters
pub trait MetricsFormatter: Send + Sync {
    /// Format a per-sink report
    ///
    /// `drained` is the number of events committed since the previous report.
    fn format_sink(
        &self,
        sink_id: &str,
        sink_type: &str,
        snapshot: &SinkCounterSnapshot,
        drained: u64,
        interval_secs: u64,
    ) -> String;
}

/// Format count with K/M suffix for readability
pub fn format_count(count: u64) -> String {
    const K: u64 = 1000;
    const M: u64 = 1_000_000;

    if count >= M {
        format!("{:.1}M", count as f64 / M as f64)
    } else if count >= K {
        format!("{:.1}K", count as f64 / K as f64)
    } else {
        count.to_string()
    }
}
