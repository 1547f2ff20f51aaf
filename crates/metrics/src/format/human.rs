//! Human-readable metrics formatter
//!
//! # Example Output
//!
//! ```text
//! [sink:rolling_file] period: 60s | drained: 1.2K | total: 48.0K | files: 12 opened, 11 closed | failures: 0
//! ```

use super::{MetricsFormatter, format_count};
use crate::SinkCounterSnapshot;

/// Human-readable single-line formatter
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter;

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self
    }
}

impl MetricsFormatter for HumanFormatter {
    fn format_sink(
        &self,
        sink_id: &str,
        _sink_type: &str,
        snapshot: &SinkCounterSnapshot,
        drained: u64,
        interval_secs: u64,
    ) -> String {
        format!(
            "[sink:{}] period: {}s | drained: {} | total: {} | files: {} opened, {} closed | failures: {}",
            sink_id,
            interval_secs,
            format_count(drained),
            format_count(snapshot.event_drain_success),
            snapshot.connection_created,
            snapshot.connection_closed,
            snapshot.connection_failed,
        )
    }
}
