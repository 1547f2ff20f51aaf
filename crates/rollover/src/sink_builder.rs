//! Build the rolling file sink from configuration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rollover_config::{Config, SinkConfig};
use rollover_metrics::SinkMetricsConfig;
use rollover_sinks::path_manager::{NamingOptions, PathManagerKind};
use rollover_sinks::rolling_file::{BackoffPolicy, RollingFileConfig, RollingFileSink};
use rollover_sinks::serializer::{SerializerKind, SerializerOptions};
use rollover_sinks::Channel;

/// Create the sink and its driver backoff from a validated config
pub fn build_sink(
    config: &Config,
    channel: Arc<dyn Channel>,
) -> Result<(RollingFileSink, BackoffPolicy)> {
    let sink = &config.sink;
    let directory = sink
        .directory
        .as_deref()
        .context("sink.directory is required")?;

    let path_manager = sink
        .path_manager
        .kind
        .parse::<PathManagerKind>()?
        .build(naming_options(sink))
        .context("invalid path manager configuration")?;

    let serializer_factory = sink
        .serializer
        .kind
        .parse::<SerializerKind>()?
        .factory(SerializerOptions {
            append_newline: sink.serializer.append_newline,
        });

    let rolling = RollingFileConfig::new(PathBuf::from(directory))
        .with_roll_interval(sink.roll_interval())
        .with_batch_size(sink.batch_size);
    let rolling = RollingFileConfig {
        metrics: SinkMetricsConfig {
            enabled: config.metrics.enabled,
            interval: config.metrics.interval,
        },
        ..rolling
    };

    let backoff = BackoffPolicy {
        increment: sink.backoff.increment,
        max: sink.backoff.max,
    };

    Ok((
        RollingFileSink::new(
            sink.name.clone(),
            rolling,
            channel,
            path_manager,
            serializer_factory,
        ),
        backoff,
    ))
}

fn naming_options(sink: &SinkConfig) -> NamingOptions {
    let pm = &sink.path_manager;
    NamingOptions {
        prefix: pm.prefix.clone(),
        use_creation_timestamp: pm.use_creation_timestamp,
        creation_timestamp_pattern: pm.creation_timestamp_pattern.clone(),
        extension: pm.extension.clone(),
        in_use_extension: pm.in_use_extension.clone(),
    }
}
