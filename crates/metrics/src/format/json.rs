//! JSON metrics formatter
//!
//! Formats metrics as structured JSON for machine parsing.
//!
//! # Example Output
//!
//! ```json
//! {"type":"sink","sink_id":"rolling_file","sink_type":"rolling_file","period_secs":60,"drained":1200,"counters":{...}}
//! ```

use super::MetricsFormatter;
use crate::SinkCounterSnapshot;
use serde::Serialize;

/// JSON metrics formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct SinkReportJson<'a> {
    #[serde(rename = "type")]
    report_type: &'static str,
    sink_id: &'a str,
    sink_type: &'a str,
    period_secs: u64,
    drained: u64,
    counters: &'a SinkCounterSnapshot,
}

impl MetricsFormatter for JsonFormatter {
    fn format_sink(
        &self,
        sink_id: &str,
        sink_type: &str,
        snapshot: &SinkCounterSnapshot,
        drained: u64,
        interval_secs: u64,
    ) -> String {
        let json = SinkReportJson {
            report_type: "sink",
            sink_id,
            sink_type,
            period_secs: interval_secs,
            drained,
            counters: snapshot,
        };

        serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string())
    }
}
