//! Rollover - drain stdin into rotating files
//!
//! # Usage
//!
//! ```bash
//! # Spool a stream into /var/spool/events, rolling every 30s
//! tail -F app.log | rollover --directory /var/spool/events
//!
//! # Full configuration from a file
//! rollover --config rollover.toml
//! ```
//!
//! Input lines are queued in a bounded in-memory channel and drained by the
//! rolling file sink. On EOF the channel is drained completely before the
//! sink stops; on Ctrl+C or SIGTERM the sink stops after its current batch.
//! In both cases the last file is finalized.

mod sink_builder;
mod stdin_source;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rollover_config::{Config, LogConfig, LogFormat, LogOutput};
use rollover_metrics::{SinkMetricsProvider, spawn_sink_reporters};
use rollover_sinks::{MemoryChannel, SinkRunner};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Maximum lines buffered between stdin and the sink
const CHANNEL_CAPACITY: usize = 10_000;

/// Poll interval while waiting for the channel to drain after EOF
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Rollover - durable rotating file sink
#[derive(Parser, Debug)]
#[command(name = "rollover")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory. Overrides config file.
    #[arg(short, long)]
    directory: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.log.level.as_str());
    init_logging(log_level, &config.log)?;

    run(config).await
}

/// Load the config file (if any), apply CLI overrides, then validate
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file_unchecked(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(directory) = &cli.directory {
        config.sink.directory = Some(directory.clone());
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    let channel = Arc::new(MemoryChannel::with_capacity("stdin", CHANNEL_CAPACITY));
    let (sink, backoff) = sink_builder::build_sink(&config, channel.clone())?;

    let cancel = CancellationToken::new();

    let metrics_handle: Arc<dyn SinkMetricsProvider> = Arc::new(sink.metrics_handle());
    let reporters = if config.metrics.enabled {
        spawn_sink_reporters(vec![metrics_handle], config.metrics.format, cancel.clone())
    } else {
        Vec::new()
    };

    let sink_task = tokio::spawn(SinkRunner::new(sink, backoff).run(cancel.clone()));

    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = stdin_source::pump_lines(reader, &channel, &cancel) => {
            let lines = result.context("failed to read stdin")?;
            info!(lines, "end of input, draining channel");
            tokio::select! {
                _ = wait_for_drain(&channel) => {}
                _ = wait_for_shutdown() => info!("shutdown signal received"),
            }
        }
        _ = wait_for_shutdown() => info!("shutdown signal received"),
    }

    cancel.cancel();

    let snapshot = sink_task
        .await
        .context("sink task panicked")?
        .context("sink failed to start")?;

    for reporter in reporters {
        if let Err(e) = reporter.await {
            warn!(error = %e, "metrics reporter panicked");
        }
    }

    if !channel.is_empty() {
        warn!(pending = channel.len(), "exiting with undelivered events");
    }

    info!(
        drained = snapshot.event_drain_success,
        files = snapshot.connection_closed,
        failures = snapshot.connection_failed,
        "rollover shutdown complete"
    );
    Ok(())
}

async fn wait_for_drain(channel: &MemoryChannel) {
    while !channel.is_empty() {
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let writer = match log.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = match log.format {
        LogFormat::Console => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    Ok(())
}
