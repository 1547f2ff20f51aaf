//! Naming policy without an in-use marker
//!
//! Files carry their final name from creation. Rotation releases the
//! active file so the next call allocates a new one; nothing is renamed.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{NamingOptions, PathManager, RollingPathManager};
use crate::error::NamingError;

/// Path manager producing `{prefix}{series}-{index}[.{extension}]`
#[derive(Debug)]
pub struct PlainPathManager {
    inner: RollingPathManager,
}

impl PlainPathManager {
    /// Create a manager; only `prefix` and `extension` are honored
    pub fn new(options: NamingOptions) -> Self {
        let options = NamingOptions {
            prefix: options.prefix,
            extension: options.extension,
            use_creation_timestamp: false,
            creation_timestamp_pattern: String::new(),
            in_use_extension: String::new(),
        };
        Self {
            inner: RollingPathManager::from_validated(options, Utc::now().timestamp_millis()),
        }
    }
}

impl PathManager for PlainPathManager {
    fn next_file(&mut self) -> Result<PathBuf, NamingError> {
        self.inner.next_file()
    }

    fn current_file(&mut self) -> Result<PathBuf, NamingError> {
        self.inner.current_file()
    }

    fn rotate(&mut self) -> Result<Option<PathBuf>, NamingError> {
        self.inner.rotate()
    }

    fn base_directory(&self) -> Option<&Path> {
        self.inner.base_directory()
    }

    fn set_base_directory(&mut self, directory: PathBuf) {
        self.inner.set_base_directory(directory);
    }
}
