//! Rollover Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Only the output directory is required - everything else has a default.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use rollover_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[sink]\ndirectory = \"out/\"").unwrap();
//! assert_eq!(config.sink.batch_size, 100);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [metrics]
//! interval = "30s"
//!
//! [sink]
//! directory = "/var/spool/events"
//! roll_interval = 30
//! batch_size = 100
//!
//! [sink.serializer]
//! type = "text"
//! append_newline = true
//!
//! [sink.path_manager]
//! type = "default"
//! prefix = "app"
//! extension = "log"
//! in_use_extension = "tmp"
//! ```

mod error;
mod logging;
mod metrics;
mod sink;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use metrics::{MetricsConfig, MetricsFormat};
pub use sink::{
    BackoffConfig, KNOWN_PATH_MANAGER_TYPES, KNOWN_SERIALIZER_TYPES, PathManagerConfig,
    SerializerConfig, SinkConfig, is_known_path_manager_type, is_known_serializer_type,
};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults, but `sink.directory`
/// must be set for the configuration to validate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Metrics reporting configuration
    pub metrics: MetricsConfig,

    /// Rolling file sink configuration
    pub sink: SinkConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::from_file_unchecked(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file without validating it
    ///
    /// For callers that apply overrides (e.g. CLI flags) first and then
    /// call [`Config::validate`].
    pub fn from_file_unchecked<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(ConfigError::ParseError)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Called by `from_str`/`from_file`; call it again after overriding
    /// fields programmatically.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn test_empty_config_requires_directory() {
        let err = Config::from_str("").unwrap_err();
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_str("[sink]\ndirectory = \"out\"").unwrap();
        assert_eq!(config.sink.directory.as_deref(), Some("out"));
        assert_eq!(config.sink.roll_interval, 30);
        assert_eq!(config.sink.batch_size, 100);
        assert_eq!(config.sink.serializer.kind, "text");
        assert_eq!(config.sink.path_manager.kind, "default");
        assert_eq!(config.sink.path_manager.in_use_extension, "tmp");
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[log]
level = "debug"
format = "json"

[metrics]
enabled = false
interval = "5s"

[sink]
name = "archive"
directory = "/data/out"
roll_interval = 0
batch_size = 500

[sink.serializer]
type = "header_and_text"
append_newline = false

[sink.path_manager]
type = "rolling"
prefix = "app"
use_creation_timestamp = true
creation_timestamp_pattern = "%Y%m%d%H%M%S"
extension = "log"
in_use_extension = "inprogress"

[sink.backoff]
increment = "250ms"
max = "2s"
"#;
        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.interval, Duration::from_secs(5));
        assert_eq!(config.sink.name, "archive");
        assert_eq!(config.sink.roll_interval, 0);
        assert_eq!(config.sink.batch_size, 500);
        assert_eq!(config.sink.serializer.kind, "header_and_text");
        assert!(!config.sink.serializer.append_newline);
        assert_eq!(config.sink.path_manager.prefix, "app");
        assert!(config.sink.path_manager.use_creation_timestamp);
        assert_eq!(config.sink.path_manager.in_use_extension, "inprogress");
        assert_eq!(config.sink.backoff.increment, Duration::from_millis(250));
        assert_eq!(config.sink.backoff.max, Duration::from_secs(2));
    }

    #[test]
    fn test_camel_case_aliases() {
        let toml = r#"
[sink]
directory = "out"
rollInterval = 5
batchSize = 7

[sink.pathManager]
prefix = "app"
useCreationTimestamp = true
creationTimestampPattern = "%Y"
inUseExtension = ""
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.sink.roll_interval, 5);
        assert_eq!(config.sink.batch_size, 7);
        assert_eq!(config.sink.path_manager.prefix, "app");
        assert!(config.sink.path_manager.use_creation_timestamp);
        assert_eq!(config.sink.path_manager.creation_timestamp_pattern, "%Y");
        assert!(config.sink.path_manager.in_use_extension.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sink]\ndirectory = \"spool\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.sink.directory.as_deref(), Some("spool"));
    }

    #[test]
    fn test_from_file_unchecked_allows_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sink]\nbatch_size = 10").unwrap();

        assert!(Config::from_file(file.path()).is_err());

        let mut config = Config::from_file_unchecked(file.path()).unwrap();
        config.sink.directory = Some("out".into());
        config.validate().unwrap();
        assert_eq!(config.sink.batch_size, 10);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/rollover.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
