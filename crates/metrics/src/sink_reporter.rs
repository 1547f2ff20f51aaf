//! Per-sink metrics reporter
//!
//! Logs a sink's counters at its configured interval.

use crate::{
    HumanFormatter, JsonFormatter, SinkCounterSnapshot, SinkMetricsProvider,
    format::MetricsFormatter,
};
use rollover_config::MetricsFormat;
use std::sync::Arc;
use tokio::time::{Duration, interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Per-sink metrics reporter
///
/// Reports counters for a single sink at its configured interval.
pub struct SinkReporter {
    sink: Arc<dyn SinkMetricsProvider>,
    formatter: Box<dyn MetricsFormatter>,
    previous: Option<SinkCounterSnapshot>,
}

impl SinkReporter {
    /// Create a new sink reporter
    pub fn new(sink: Arc<dyn SinkMetricsProvider>, format: MetricsFormat) -> Self {
        let formatter: Box<dyn MetricsFormatter> = match format {
            MetricsFormat::Human => Box::new(HumanFormatter::new()),
            MetricsFormat::Json => Box::new(JsonFormatter::new()),
        };

        Self {
            sink,
            formatter,
            previous: None,
        }
    }

    /// Run the reporter until cancellation
    pub async fn run(mut self, cancel: CancellationToken) {
        let config = self.sink.metrics_config();

        if !config.enabled {
            return;
        }

        let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            sink_id = self.sink.sink_id(),
            sink_type = self.sink.sink_type(),
            interval_secs = config.interval.as_secs(),
            "sink metrics reporter started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break;
                }
                _ = ticker.tick() => {
                    self.report(config.interval);
                }
            }
        }
    }

    /// Report current counters
    fn report(&mut self, report_interval: Duration) -> String {
        let snapshot = self.sink.snapshot();
        let drained = snapshot.event_drain_success
            - self.previous.map_or(0, |prev| prev.event_drain_success);

        let output = self.formatter.format_sink(
            self.sink.sink_id(),
            self.sink.sink_type(),
            &snapshot,
            drained,
            report_interval.as_secs(),
        );

        info!("{}", output);

        self.previous = Some(snapshot);
        output
    }
}

/// Spawn reporters for all sinks with metrics enabled
pub fn spawn_sink_reporters(
    sinks: Vec<Arc<dyn SinkMetricsProvider>>,
    format: MetricsFormat,
    cancel: CancellationToken,
) -> Vec<tokio::task::JoinHandle<()>> {
    sinks
        .into_iter()
        .filter(|sink| sink.metrics_config().enabled)
        .map(|sink| {
            let reporter = SinkReporter::new(sink, format);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                reporter.run(cancel).await;
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SinkCounter, SinkMetricsConfig};

    struct TestSink {
        id: String,
        counter: SinkCounter,
        config: SinkMetricsConfig,
    }

    impl SinkMetricsProvider for TestSink {
        fn sink_id(&self) -> &str {
            &self.id
        }

        fn sink_type(&self) -> &str {
            "test"
        }

        fn metrics_config(&self) -> SinkMetricsConfig {
            self.config
        }

        fn snapshot(&self) -> SinkCounterSnapshot {
            self.counter.snapshot()
        }
    }

    fn test_sink(enabled: bool, interval: Duration) -> Arc<TestSink> {
        Arc::new(TestSink {
            id: "test".into(),
            counter: SinkCounter::new(),
            config: SinkMetricsConfig { enabled, interval },
        })
    }

    #[test]
    fn test_new_reporter() {
        let sink = test_sink(true, Duration::from_secs(10));
        let reporter = SinkReporter::new(sink, MetricsFormat::Human);
        assert!(reporter.previous.is_none());
    }

    #[tokio::test]
    async fn test_run_disabled() {
        let sink = test_sink(false, Duration::from_secs(10));
        let reporter = SinkReporter::new(sink, MetricsFormat::Human);

        // Returns immediately when disabled
        reporter.run(CancellationToken::new()).await;
    }

    #[tokio::test]
    async fn test_run_cancellation() {
        let sink = test_sink(true, Duration::from_millis(100));
        let reporter = SinkReporter::new(sink, MetricsFormat::Json);
        let cancel = CancellationToken::new();

        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        reporter.run(cancel).await;
    }

    #[test]
    fn test_report_uses_delta_since_previous() {
        let sink = test_sink(true, Duration::from_secs(10));
        let mut reporter = SinkReporter::new(sink.clone(), MetricsFormat::Human);

        sink.counter.add_event_drain_success(100);
        let first = reporter.report(Duration::from_secs(10));
        assert!(first.contains("drained: 100"));

        sink.counter.add_event_drain_success(20);
        let second = reporter.report(Duration::from_secs(10));
        assert!(second.contains("drained: 20"));
        assert!(second.contains("total: 120"));
        assert_eq!(reporter.previous.unwrap().event_drain_success, 120);
    }

    #[tokio::test]
    async fn test_spawn_filters_disabled() {
        let enabled: Arc<dyn SinkMetricsProvider> = test_sink(true, Duration::from_secs(10));
        let disabled: Arc<dyn SinkMetricsProvider> = test_sink(false, Duration::from_secs(10));
        let cancel = CancellationToken::new();

        let handles = spawn_sink_reporters(vec![enabled, disabled], MetricsFormat::Human, cancel.clone());
        assert_eq!(handles.len(), 1);

        cancel.cancel();
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
