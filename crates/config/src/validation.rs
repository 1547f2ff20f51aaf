//! Configuration validation
//!
//! Validates config consistency:
//! - The sink has an output directory
//! - Batch size is non-zero
//! - Serializer and path manager types are known
//! - Backoff bounds are ordered
//! - Metrics reporting has a non-zero interval when enabled

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::metrics::MetricsConfig;
use crate::sink::{SinkConfig, is_known_path_manager_type, is_known_serializer_type};

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_sink(&config.sink)?;
    validate_metrics(&config.metrics)?;
    Ok(())
}

fn validate_metrics(metrics: &MetricsConfig) -> Result<()> {
    if metrics.enabled && metrics.interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "metrics",
            "metrics",
            "interval",
            "must be greater than zero",
        ));
    }
    Ok(())
}

/// Validate the rolling file sink section
fn validate_sink(sink: &SinkConfig) -> Result<()> {
    let name = sink.name.as_str();

    match sink.directory.as_deref() {
        None => return Err(ConfigError::missing_field("sink", name, "directory")),
        Some(dir) if dir.trim().is_empty() => {
            return Err(ConfigError::invalid_value(
                "sink",
                name,
                "directory",
                "must not be empty",
            ));
        }
        Some(_) => {}
    }

    if sink.batch_size == 0 {
        return Err(ConfigError::invalid_value(
            "sink",
            name,
            "batch_size",
            "must be greater than zero",
        ));
    }

    if !is_known_serializer_type(&sink.serializer.kind) {
        return Err(ConfigError::invalid_value(
            "sink",
            name,
            "serializer",
            format!("unknown serializer type '{}'", sink.serializer.kind),
        ));
    }

    if !is_known_path_manager_type(&sink.path_manager.kind) {
        return Err(ConfigError::invalid_value(
            "sink",
            name,
            "path_manager",
            format!("unknown path manager type '{}'", sink.path_manager.kind),
        ));
    }

    if sink.backoff.max < sink.backoff.increment {
        return Err(ConfigError::invalid_value(
            "sink",
            name,
            "backoff",
            "max must be at least the increment",
        ));
    }

    Ok(())
}
