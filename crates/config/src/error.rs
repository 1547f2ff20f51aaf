//! Errors from loading and validating `rollover.toml`

use std::io;
use thiserror::Error;

/// Shorthand used by `Config::from_file` and validation
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Why a configuration was refused
///
/// Validation errors name the table (`sink`, `metrics`) and the sink's
/// `name`, so a message reads like `sink 'archive' has invalid batch_size`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `--config` file could not be read
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Not valid TOML, or a key has the wrong type
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A key with no usable default, such as `sink.directory`
    #[error("{component} '{name}' is missing required field '{field}'")]
    MissingField {
        /// Table the key belongs to
        component: &'static str,
        name: String,
        field: &'static str,
    },

    /// Parsed fine but cannot run, e.g. `batch_size = 0`
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        component: &'static str,
        name: String,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// `field` is absent from the `component` table named `name`
    pub fn missing_field(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
    ) -> Self {
        Self::MissingField {
            component,
            name: name.into(),
            field,
        }
    }

    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = ConfigError::missing_field("sink", "rolling_file", "directory");
        assert!(err.to_string().contains("sink"));
        assert!(err.to_string().contains("rolling_file"));
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value(
            "sink",
            "rolling_file",
            "batch_size",
            "must be greater than zero",
        );
        assert!(err.to_string().contains("rolling_file"));
        assert!(err.to_string().contains("batch_size"));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_messages_name_the_sink() {
        let err = ConfigError::missing_field("sink", "archive", "directory");
        assert_eq!(
            err.to_string(),
            "sink 'archive' is missing required field 'directory'"
        );

        let err = ConfigError::invalid_value(
            "metrics",
            "metrics",
            "interval",
            "must be greater than zero",
        );
        assert_eq!(
            err.to_string(),
            "metrics 'metrics' has invalid interval: must be greater than zero"
        );
    }
}
