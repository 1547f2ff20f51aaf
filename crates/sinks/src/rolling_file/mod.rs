//! Rolling File Sink - transactional drain to rotating files
//!
//! Drains bounded batches from a [`Channel`] into the active output file and
//! periodically promotes that file to its final name.
//!
//! # Drain Loop
//!
//! Each call to [`RollingFileSink::process`] runs:
//!
//! ```text
//! MaybeRotate → MaybeOpen → DrainBatch → Commit | Rollback
//! ```
//!
//! - **MaybeRotate**: if the timer asked for a rotation and a file is open,
//!   flush and close it, then let the path manager finalize it
//! - **MaybeOpen**: if no file is open, open the path manager's current file
//!   in append mode with a fresh serializer
//! - **DrainBatch**: take up to `batch_size` events inside one transaction,
//!   write them, flush, then commit
//!
//! Any failure inside the transaction rolls it back in full and removes the
//! batch's bytes from the file, so an event is only acknowledged once it is
//! both written and committed.
//!
//! # Rotation
//!
//! The [`Roller`] task only raises a flag. The file is closed and renamed
//! by the drain loop itself, so a write is never in flight during rotation.
//!
//! ```text
//! [Roller] --flag--> [process()] --> [PathManager::rotate()] --> app1000-1.log
//! ```

mod roller;
mod runner;

pub use roller::Roller;
pub use runner::{BackoffPolicy, SinkRunner};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rollover_metrics::{SinkCounter, SinkCounterSnapshot, SinkMetricsConfig, SinkMetricsProvider};
use tracing::{debug, error, info, warn};

use crate::channel::{Channel, Transaction};
use crate::error::{SinkError, TransactionError};
use crate::path_manager::PathManager;
use crate::serializer::{EventSerializer, SerializerFactory};
use crate::util::{DEFAULT_BUFFER_SIZE, OutputStream};

/// Sink type reported to the metrics reporter
pub const SINK_TYPE: &str = "rolling_file";

/// Configuration for the rolling file sink
#[derive(Debug, Clone)]
pub struct RollingFileConfig {
    /// Directory output files are created in
    pub directory: PathBuf,

    /// Time between rotation requests; `None` disables timed rotation
    pub roll_interval: Option<Duration>,

    /// Maximum events drained per `process()` call; 0 is treated as 1
    pub batch_size: usize,

    /// Output stream write buffer size
    pub buffer_size: usize,

    /// Metrics reporting for this sink
    pub metrics: SinkMetricsConfig,
}

impl Default for RollingFileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            roll_interval: Some(Duration::from_secs(30)),
            batch_size: 100,
            buffer_size: DEFAULT_BUFFER_SIZE,
            metrics: SinkMetricsConfig::default(),
        }
    }
}

impl RollingFileConfig {
    /// Create config for the given output directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_roll_interval(mut self, interval: Option<Duration>) -> Self {
        self.roll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Outcome of one drain loop invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A full batch was drained; more events are likely waiting
    Ready,
    /// The channel ran dry; the caller should slow down
    Backoff,
}

/// The active output file and its serializer
///
/// Both exist together or not at all.
struct OpenFile {
    path: PathBuf,
    stream: OutputStream,
    serializer: Box<dyn EventSerializer>,
}

impl OpenFile {
    fn close(mut self) -> io::Result<()> {
        self.serializer.flush(&mut self.stream)?;
        self.serializer.before_close(&mut self.stream)?;
        self.stream.close()
    }
}

/// Handle for accessing rolling file sink metrics
///
/// It holds an Arc to the counters, so it stays valid after the sink is
/// moved into a runner.
#[derive(Clone)]
pub struct RollingFileSinkMetricsHandle {
    id: String,
    counter: Arc<SinkCounter>,
    config: SinkMetricsConfig,
}

impl SinkMetricsProvider for RollingFileSinkMetricsHandle {
    fn sink_id(&self) -> &str {
        &self.id
    }

    fn sink_type(&self) -> &str {
        SINK_TYPE
    }

    fn metrics_config(&self) -> SinkMetricsConfig {
        self.config
    }

    fn snapshot(&self) -> SinkCounterSnapshot {
        self.counter.snapshot()
    }
}

/// Durable rotating file sink
pub struct RollingFileSink {
    name: String,
    config: RollingFileConfig,
    channel: Arc<dyn Channel>,
    path_manager: Box<dyn PathManager>,
    serializer_factory: SerializerFactory,

    /// Active file, `None` between rotation and the next open
    open: Option<OpenFile>,

    /// Set by the roller, cleared by the drain loop
    should_rotate: Arc<AtomicBool>,
    roller: Option<Roller>,

    counter: Arc<SinkCounter>,
}

impl RollingFileSink {
    /// Create a sink; nothing touches the file system until `start()`
    pub fn new(
        name: impl Into<String>,
        mut config: RollingFileConfig,
        channel: Arc<dyn Channel>,
        path_manager: Box<dyn PathManager>,
        serializer_factory: SerializerFactory,
    ) -> Self {
        config.batch_size = config.batch_size.max(1);
        Self {
            name: name.into(),
            config,
            channel,
            path_manager,
            serializer_factory,
            open: None,
            should_rotate: Arc::new(AtomicBool::new(false)),
            roller: None,
            counter: Arc::new(SinkCounter::new()),
        }
    }

    /// Sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sink configuration
    pub fn config(&self) -> &RollingFileConfig {
        &self.config
    }

    /// Counters updated by this sink
    pub fn counter(&self) -> &SinkCounter {
        &self.counter
    }

    /// Get a metrics handle for reporting
    pub fn metrics_handle(&self) -> RollingFileSinkMetricsHandle {
        RollingFileSinkMetricsHandle {
            id: self.name.clone(),
            counter: Arc::clone(&self.counter),
            config: self.config.metrics,
        }
    }

    /// Path of the currently open file, if any
    pub fn active_file(&self) -> Option<&Path> {
        self.open.as_ref().map(|open| open.path.as_path())
    }

    /// Ask for a rotation at the start of the next `process()` call
    pub fn request_rotation(&self) {
        self.should_rotate.store(true, Ordering::Release);
    }

    /// Whether a rotation request is pending
    pub fn rotation_pending(&self) -> bool {
        self.should_rotate.load(Ordering::Acquire)
    }

    /// Create the output directory and start the rotation timer
    ///
    /// Fails with [`SinkError::NoRuntime`] when a roll interval is
    /// configured outside a Tokio runtime.
    pub fn start(&mut self) -> Result<(), SinkError> {
        let interval = self.config.roll_interval.filter(|period| !period.is_zero());
        if interval.is_some() && tokio::runtime::Handle::try_current().is_err() {
            return Err(SinkError::NoRuntime);
        }

        let directory = self.config.directory.clone();
        fs::create_dir_all(&directory).map_err(|source| SinkError::CreateDir {
            path: directory.clone(),
            source,
        })?;
        self.path_manager.set_base_directory(directory);

        if let Some(period) = interval {
            self.roller = Some(Roller::spawn(
                self.name.clone(),
                period,
                Arc::clone(&self.should_rotate),
            ));
        }

        info!(
            sink = %self.name,
            directory = %self.config.directory.display(),
            roll_interval_secs = interval.map(|p| p.as_secs_f64()),
            batch_size = self.config.batch_size,
            "rolling file sink started"
        );
        Ok(())
    }

    /// Run one drain loop invocation
    ///
    /// Errors are fatal to this invocation only. Nothing is acknowledged to
    /// the channel unless it was written, flushed and committed, so the
    /// caller can simply retry later.
    pub fn process(&mut self) -> Result<Status, SinkError> {
        self.maybe_rotate()?;

        let mut open = match self.open.take() {
            Some(open) => open,
            None => self.open_current()?,
        };

        let batch_size = self.config.batch_size;
        let checkpoint = open.stream.position();
        let channel = Arc::clone(&self.channel);
        let mut tx = channel.transaction();

        match drain_batch(tx.as_mut(), &mut open, batch_size, &self.counter) {
            Ok(drained) => {
                tx.close();
                self.counter.record_batch(drained, batch_size);
                self.counter.add_event_drain_success(drained as u64);
                self.open = Some(open);
                Ok(if drained < batch_size {
                    Status::Backoff
                } else {
                    Status::Ready
                })
            }
            Err(source) => {
                if let Err(e) = tx.rollback() {
                    warn!(sink = %self.name, error = %e, "rollback failed");
                }
                tx.close();

                let path = open.path.clone();
                match open.stream.truncate_to(checkpoint) {
                    Ok(()) => self.open = Some(open),
                    Err(e) => {
                        // reopened in append mode on the next call
                        self.counter.inc_connection_failed();
                        error!(
                            sink = %self.name,
                            file = %path.display(),
                            error = %e,
                            "failed to discard rolled back batch"
                        );
                    }
                }
                Err(SinkError::Transaction { path, source })
            }
        }
    }

    /// Close the open file, finalize it and stop the rotation timer
    ///
    /// Callers must not run `process()` concurrently with `stop()`.
    pub async fn stop(&mut self) {
        if let Some(open) = self.open.take() {
            debug!(sink = %self.name, file = %open.path.display(), "closing file");
            let path = open.path.clone();
            match open.close() {
                Ok(()) => self.counter.inc_connection_closed(),
                Err(e) => {
                    self.counter.inc_connection_failed();
                    error!(
                        sink = %self.name,
                        file = %path.display(),
                        error = %e,
                        "unable to close output file"
                    );
                }
            }
        }

        self.finalize_current();

        if let Some(roller) = self.roller.take() {
            roller.shutdown().await;
        }

        let snapshot = self.counter.snapshot();
        info!(
            sink = %self.name,
            files_opened = snapshot.connection_created,
            files_closed = snapshot.connection_closed,
            failures = snapshot.connection_failed,
            drained = snapshot.event_drain_success,
            "rolling file sink stopped"
        );
    }

    fn maybe_rotate(&mut self) -> Result<(), SinkError> {
        if !self.should_rotate.load(Ordering::Acquire) {
            return Ok(());
        }
        let Some(open) = self.open.take() else {
            return Ok(());
        };

        debug!(sink = %self.name, file = %open.path.display(), "time to rotate");
        let path = open.path.clone();
        if let Err(source) = open.close() {
            self.counter.inc_connection_failed();
            return Err(SinkError::Rotate { path, source });
        }
        self.counter.inc_connection_closed();
        self.should_rotate.store(false, Ordering::Release);

        self.finalize_current();
        Ok(())
    }

    fn open_current(&mut self) -> Result<OpenFile, SinkError> {
        let path = self.path_manager.current_file().inspect_err(|_| {
            self.counter.inc_connection_failed();
        })?;

        debug!(sink = %self.name, file = %path.display(), "opening output file");

        let mut stream = match OutputStream::open(&path, self.config.buffer_size) {
            Ok(stream) => stream,
            Err(source) => {
                self.counter.inc_connection_failed();
                return Err(SinkError::Open { path, source });
            }
        };

        let mut serializer = (self.serializer_factory)();
        if let Err(source) = serializer.after_create(&mut stream) {
            self.counter.inc_connection_failed();
            return Err(SinkError::Open { path, source });
        }

        self.counter.inc_connection_created();
        Ok(OpenFile {
            path,
            stream,
            serializer,
        })
    }

    /// Rename the path manager's active file; failures leave it in-use
    fn finalize_current(&mut self) {
        match self.path_manager.rotate() {
            Ok(Some(path)) => {
                info!(sink = %self.name, file = %path.display(), "file finalized");
            }
            Ok(None) => {}
            Err(e) => {
                error!(sink = %self.name, error = %e, "failed to finalize file");
            }
        }
    }
}

/// Take, write and commit one batch; returns the number of events drained
fn drain_batch(
    tx: &mut dyn Transaction,
    open: &mut OpenFile,
    batch_size: usize,
    counter: &SinkCounter,
) -> Result<usize, TransactionError> {
    tx.begin()?;

    let mut drained = 0;
    while drained < batch_size {
        let Some(event) = tx.take()? else {
            break;
        };
        counter.inc_event_drain_attempt();
        drained += 1;
        open.serializer.write(&event, &mut open.stream)?;
    }

    open.serializer.flush(&mut open.stream)?;
    io::Write::flush(&mut open.stream)?;
    tx.commit()?;
    Ok(drained)
}
