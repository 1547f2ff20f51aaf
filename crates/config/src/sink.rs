//! Rolling file sink configuration
//!
//! The sink drains events from the upstream channel and writes them to a
//! rotating set of files under `directory`. Keys accept both snake_case and
//! the camelCase spellings used by older deployments (`rollInterval`,
//! `batchSize`, `pathManager`, ...).

use serde::Deserialize;
use std::time::Duration;

/// Known serializer types for validation
pub const KNOWN_SERIALIZER_TYPES: &[&str] = &["text", "header_and_text", "json"];

/// Known path manager types for validation
pub const KNOWN_PATH_MANAGER_TYPES: &[&str] = &["default", "rolling", "plain"];

/// Check if a serializer type is known (case-insensitive)
pub fn is_known_serializer_type(serializer_type: &str) -> bool {
    KNOWN_SERIALIZER_TYPES.contains(&serializer_type.to_ascii_lowercase().as_str())
}

/// Check if a path manager type is known (case-insensitive)
pub fn is_known_path_manager_type(path_manager_type: &str) -> bool {
    KNOWN_PATH_MANAGER_TYPES.contains(&path_manager_type.to_ascii_lowercase().as_str())
}

/// Rolling file sink configuration
///
/// # Example
///
/// ```toml
/// [sink]
/// directory = "/var/spool/events"
/// roll_interval = 30
/// batch_size = 100
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Sink name used in logs and metrics
    /// Default: "rolling_file"
    pub name: String,

    /// Target directory for output files
    /// Required
    pub directory: Option<String>,

    /// Seconds between rotation requests; `<= 0` disables timed rotation
    /// Default: 30
    #[serde(alias = "rollInterval")]
    pub roll_interval: i64,

    /// Maximum events drained per invocation
    /// Default: 100
    #[serde(alias = "batchSize")]
    pub batch_size: usize,

    /// Serializer type and options
    pub serializer: SerializerConfig,

    /// Naming policy type and options
    #[serde(alias = "pathManager")]
    pub path_manager: PathManagerConfig,

    /// Driver backoff when the channel is empty or delivery fails
    pub backoff: BackoffConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            name: "rolling_file".into(),
            directory: None,
            roll_interval: 30,
            batch_size: 100,
            serializer: SerializerConfig::default(),
            path_manager: PathManagerConfig::default(),
            backoff: BackoffConfig::default(),
        }
    }
}

impl SinkConfig {
    /// Roll interval as a duration, `None` when timed rotation is disabled
    pub fn roll_interval(&self) -> Option<Duration> {
        u64::try_from(self.roll_interval)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Serializer configuration
///
/// ```toml
/// [sink.serializer]
/// type = "text"
/// append_newline = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Serializer type (text, header_and_text, json)
    /// Default: text
    #[serde(rename = "type")]
    pub kind: String,

    /// Terminate every event with a newline
    /// Default: true
    #[serde(alias = "appendNewline")]
    pub append_newline: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            kind: "text".into(),
            append_newline: true,
        }
    }
}

/// Path manager (file naming policy) configuration
///
/// Files are named `{prefix}{timestamp}-{index}[.{extension}][.{in_use_extension}]`.
///
/// ```toml
/// [sink.path_manager]
/// type = "default"
/// prefix = "app"
/// extension = "log"
/// in_use_extension = "tmp"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathManagerConfig {
    /// Naming policy type (default/rolling, plain)
    /// Default: default
    #[serde(rename = "type")]
    pub kind: String,

    /// File name prefix
    /// Default: ""
    pub prefix: String,

    /// Use a fresh timestamp per file instead of one per series
    /// Default: false
    #[serde(alias = "useCreationTimestamp")]
    pub use_creation_timestamp: bool,

    /// strftime pattern for per-file timestamps (`%Y%m%d%H%M%S`, not
    /// `yyyyMMddHHmmss`); empty means epoch millis. A pattern without `%`
    /// specifiers is written into file names verbatim.
    /// Default: ""
    #[serde(alias = "creationTimestampPattern")]
    pub creation_timestamp_pattern: String,

    /// Extension of finalized files
    /// Default: ""
    pub extension: String,

    /// Marker extension of in-progress files
    /// Default: "tmp"
    #[serde(alias = "inUseExtension")]
    pub in_use_extension: String,
}

impl Default for PathManagerConfig {
    fn default() -> Self {
        Self {
            kind: "default".into(),
            prefix: String::new(),
            use_creation_timestamp: false,
            creation_timestamp_pattern: String::new(),
            extension: String::new(),
            in_use_extension: "tmp".into(),
        }
    }
}

/// Driver backoff configuration
///
/// The sleep grows by `increment` after each consecutive backoff, capped at
/// `max`, and resets once a batch comes back ready.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Sleep increment per consecutive backoff
    /// Default: 1s
    #[serde(with = "humantime_serde")]
    pub increment: Duration,

    /// Maximum sleep
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub max: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            increment: Duration::from_secs(1),
            max: Duration::from_secs(5),
        }
    }
}
