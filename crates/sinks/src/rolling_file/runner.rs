//! Sink driver
//!
//! Invokes the drain loop serially until cancelled. `Backoff` and delivery
//! failures put the driver to sleep for a linearly growing delay, capped at
//! `max`; a `Ready` result resets the delay.

use std::time::Duration;

use rollover_metrics::SinkCounterSnapshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{RollingFileSink, Status};
use crate::error::SinkError;
use crate::util::{DEFAULT_LOG_INTERVAL, RateLimitedLogger};

/// Linear backoff between idle or failed invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay added per consecutive backoff
    pub increment: Duration,
    /// Upper bound on the delay
    pub max: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            increment: Duration::from_secs(1),
            max: Duration::from_secs(5),
        }
    }
}

impl BackoffPolicy {
    /// Delay after `attempt` consecutive backoffs (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.increment.saturating_mul(attempt).min(self.max)
    }
}

/// Drives a [`RollingFileSink`] until cancellation
pub struct SinkRunner {
    sink: RollingFileSink,
    backoff: BackoffPolicy,
    error_logger: RateLimitedLogger,
}

impl SinkRunner {
    pub fn new(sink: RollingFileSink, backoff: BackoffPolicy) -> Self {
        let error_logger = RateLimitedLogger::new(sink.name(), DEFAULT_LOG_INTERVAL);
        Self {
            sink,
            backoff,
            error_logger,
        }
    }

    /// Start the sink, drain until `cancel` fires, then stop it
    ///
    /// Returns the final counters. Only a failure to start is returned as an
    /// error; delivery failures are logged and retried.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<SinkCounterSnapshot, SinkError> {
        self.sink.start()?;

        let mut consecutive: u32 = 0;
        while !cancel.is_cancelled() {
            let delay = match self.sink.process() {
                Ok(Status::Ready) => {
                    consecutive = 0;
                    tokio::task::yield_now().await;
                    continue;
                }
                Ok(Status::Backoff) => {
                    consecutive = consecutive.saturating_add(1);
                    self.backoff.delay(consecutive)
                }
                Err(e) => {
                    self.error_logger.error("unable to deliver events", &e);
                    consecutive = 0;
                    self.backoff.max
                }
            };

            debug!(sink = %self.sink.name(), delay_ms = delay.as_millis() as u64, "backing off");
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!(sink = %self.sink.name(), "stopping rolling file sink");
        self.sink.stop().await;
        Ok(self.sink.counter().snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_linear_and_capped() {
        let policy = BackoffPolicy {
            increment: Duration::from_millis(100),
            max: Duration::from_millis(250),
        };
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(250));
        assert_eq!(policy.delay(u32::MAX), Duration::from_millis(250));
    }

    #[test]
    fn test_default_policy() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.increment, Duration::from_secs(1));
        assert_eq!(policy.max, Duration::from_secs(5));
    }
}
