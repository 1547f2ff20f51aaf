//! File naming policies
//!
//! A path manager owns the name of the active output file. It hands out
//! names lazily through [`PathManager::current_file`] and promotes the
//! active file to its final name on [`PathManager::rotate`].
//!
//! Names are built as:
//!
//! ```text
//! {prefix}{timestamp}-{index}[.{extension}][.{in_use_extension}]
//! ```
//!
//! The index starts at 1 and increments on every `next_file()` call, so
//! names never repeat within one manager instance.
//!
//! # Available Policies
//!
//! | Type | Behavior |
//! |------|----------|
//! | `default` / `rolling` | In-use marker while writing, renamed on rotation |
//! | `plain` | Final name from the start, rotation only releases the file |

mod plain;
mod rolling;

pub use plain::PlainPathManager;
pub use rolling::RollingPathManager;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::NamingError;

/// Default marker extension for files still being written
pub const DEFAULT_IN_USE_EXTENSION: &str = "tmp";

/// Naming policy for the sink's output files
///
/// Only the drain loop calls into a path manager, so implementations need
/// no internal locking.
pub trait PathManager: Send {
    /// Allocate a fresh name and make it the active file
    fn next_file(&mut self) -> Result<PathBuf, NamingError>;

    /// Active file, allocating one if none is active
    ///
    /// Repeated calls return the same path until `rotate()` or
    /// `next_file()` is called.
    fn current_file(&mut self) -> Result<PathBuf, NamingError>;

    /// Finalize the active file and release it
    ///
    /// Returns the final path, or `None` if no file was active. The manager
    /// holds no active file afterwards, even when an error is returned.
    fn rotate(&mut self) -> Result<Option<PathBuf>, NamingError>;

    /// Directory new files are created in
    fn base_directory(&self) -> Option<&Path>;

    /// Set the directory new files are created in
    fn set_base_directory(&mut self, directory: PathBuf);
}

/// Naming options shared by all policies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingOptions {
    /// Leading file name segment
    pub prefix: String,
    /// Use the time of each `next_file()` call instead of the series timestamp
    pub use_creation_timestamp: bool,
    /// strftime pattern for per-file timestamps; empty means epoch millis
    pub creation_timestamp_pattern: String,
    /// Final extension, omitted when empty
    pub extension: String,
    /// In-progress marker extension, omitted when empty
    pub in_use_extension: String,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            use_creation_timestamp: false,
            creation_timestamp_pattern: String::new(),
            extension: String::new(),
            in_use_extension: DEFAULT_IN_USE_EXTENSION.to_string(),
        }
    }
}

/// Known path manager types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathManagerKind {
    /// In-use marker plus rename on rotation
    Rolling,
    /// No marker, rotation only releases the file
    Plain,
}

impl PathManagerKind {
    /// Build a path manager of this kind
    pub fn build(self, options: NamingOptions) -> Result<Box<dyn PathManager>, NamingError> {
        Ok(match self {
            Self::Rolling => Box::new(RollingPathManager::new(options)?),
            Self::Plain => Box::new(PlainPathManager::new(options)),
        })
    }
}

impl FromStr for PathManagerKind {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "rolling" => Ok(Self::Rolling),
            "plain" => Ok(Self::Plain),
            _ => Err(NamingError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for PathManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rolling => write!(f, "rolling"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("default".parse::<PathManagerKind>().unwrap(), PathManagerKind::Rolling);
        assert_eq!("ROLLING".parse::<PathManagerKind>().unwrap(), PathManagerKind::Rolling);
        assert_eq!("plain".parse::<PathManagerKind>().unwrap(), PathManagerKind::Plain);
        assert!(matches!(
            "hourly".parse::<PathManagerKind>(),
            Err(NamingError::UnknownType(t)) if t == "hourly"
        ));
    }

    #[test]
    fn test_default_options() {
        let options = NamingOptions::default();
        assert_eq!(options.in_use_extension, "tmp");
        assert!(options.prefix.is_empty());
        assert!(!options.use_creation_timestamp);
    }

    #[test]
    fn test_build_rejects_bad_pattern() {
        let options = NamingOptions {
            use_creation_timestamp: true,
            creation_timestamp_pattern: "%Q-%".into(),
            ..Default::default()
        };
        assert!(matches!(
            PathManagerKind::Rolling.build(options),
            Err(NamingError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_build_plain() {
        let mut manager = PathManagerKind::Plain.build(NamingOptions::default()).unwrap();
        manager.set_base_directory(PathBuf::from("/out"));
        let file = manager.current_file().unwrap();
        assert!(file.extension().is_none());
    }
}
