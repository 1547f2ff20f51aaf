//! Naming policy with an in-use marker
//!
//! Files are written as `{name}.{in_use_extension}` and renamed to
//! `{name}` on rotation, so consumers watching the directory only ever
//! pick up complete files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, Utc};

use super::{NamingOptions, PathManager};
use crate::error::NamingError;

/// Path manager that marks the active file and renames it on rotation
#[derive(Debug)]
pub struct RollingPathManager {
    options: NamingOptions,
    series_timestamp: i64,
    file_index: u64,
    current_file: Option<PathBuf>,
    base_directory: Option<PathBuf>,
}

impl RollingPathManager {
    /// Create a manager whose series timestamp is the current time
    pub fn new(options: NamingOptions) -> Result<Self, NamingError> {
        Self::with_series_timestamp(options, Utc::now().timestamp_millis())
    }

    /// Create a manager with a fixed series timestamp (epoch millis)
    pub fn with_series_timestamp(
        options: NamingOptions,
        series_timestamp: i64,
    ) -> Result<Self, NamingError> {
        validate_pattern(&options.creation_timestamp_pattern)?;
        Ok(Self::from_validated(options, series_timestamp))
    }

    pub(super) fn from_validated(options: NamingOptions, series_timestamp: i64) -> Self {
        Self {
            options,
            series_timestamp,
            file_index: 0,
            current_file: None,
            base_directory: None,
        }
    }

    /// Timestamp shared by every file of this manager
    pub fn series_timestamp(&self) -> i64 {
        self.series_timestamp
    }

    /// Index of the most recently allocated file, 0 before the first
    pub fn file_index(&self) -> u64 {
        self.file_index
    }

    /// Naming options in effect
    pub fn options(&self) -> &NamingOptions {
        &self.options
    }

    fn timestamp_token(&self) -> String {
        if !self.options.use_creation_timestamp {
            return self.series_timestamp.to_string();
        }
        let now = Local::now();
        if self.options.creation_timestamp_pattern.is_empty() {
            now.timestamp_millis().to_string()
        } else {
            now.format(&self.options.creation_timestamp_pattern).to_string()
        }
    }

    fn file_name(&self, timestamp: &str, index: u64) -> String {
        let mut name = format!("{}{}-{}", self.options.prefix, timestamp, index);
        if !self.options.extension.is_empty() {
            name.push('.');
            name.push_str(&self.options.extension);
        }
        if !self.options.in_use_extension.is_empty() {
            name.push('.');
            name.push_str(&self.options.in_use_extension);
        }
        name
    }

    /// Final name for an in-use file: the trailing `.{in_use_extension}`
    /// is removed, nothing else
    fn final_path(&self, file: &Path) -> Result<PathBuf, NamingError> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| NamingError::InvalidFileName(file.to_path_buf()))?;
        let suffix = format!(".{}", self.options.in_use_extension);
        match name.strip_suffix(&suffix) {
            Some(stem) if !stem.is_empty() => Ok(file.with_file_name(stem)),
            _ => Err(NamingError::MissingInUseExtension {
                file: file.to_path_buf(),
                extension: self.options.in_use_extension.clone(),
            }),
        }
    }
}

impl PathManager for RollingPathManager {
    fn next_file(&mut self) -> Result<PathBuf, NamingError> {
        let directory = self
            .base_directory
            .as_ref()
            .ok_or(NamingError::NoBaseDirectory)?;
        let index = self.file_index + 1;
        let file = directory.join(self.file_name(&self.timestamp_token(), index));
        self.file_index = index;
        self.current_file = Some(file.clone());
        Ok(file)
    }

    fn current_file(&mut self) -> Result<PathBuf, NamingError> {
        match &self.current_file {
            Some(file) => Ok(file.clone()),
            None => self.next_file(),
        }
    }

    fn rotate(&mut self) -> Result<Option<PathBuf>, NamingError> {
        let Some(current) = self.current_file.take() else {
            return Ok(None);
        };

        if self.options.in_use_extension.is_empty() {
            return Ok(Some(current));
        }

        let destination = self.final_path(&current)?;
        if destination.exists() {
            return Err(NamingError::DestinationExists {
                from: current,
                to: destination,
            });
        }

        fs::rename(&current, &destination).map_err(|source| NamingError::Rename {
            from: current.clone(),
            to: destination.clone(),
            source,
        })?;

        tracing::debug!(
            from = %current.display(),
            to = %destination.display(),
            "finalized file"
        );

        Ok(Some(destination))
    }

    fn base_directory(&self) -> Option<&Path> {
        self.base_directory.as_deref()
    }

    fn set_base_directory(&mut self, directory: PathBuf) {
        self.base_directory = Some(directory);
    }
}

fn validate_pattern(pattern: &str) -> Result<(), NamingError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(NamingError::InvalidPattern(pattern.to_string()));
    }
    if !pattern.is_empty() && !has_specifiers(pattern) {
        tracing::warn!(
            pattern,
            "creation timestamp pattern has no strftime specifiers and is used verbatim"
        );
    }
    Ok(())
}

/// Whether a strftime pattern contains any `%` conversion
fn has_specifiers(pattern: &str) -> bool {
    StrftimeItems::new(pattern).any(|item| {
        !matches!(
            item,
            Item::Literal(_) | Item::OwnedLiteral(_) | Item::Space(_) | Item::OwnedSpace(_)
        )
    })
}

#[cfg(test)]
#[path = "rolling_test.rs"]
mod rolling_test;
