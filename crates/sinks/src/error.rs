//! Error types shared by the rolling file sink and its collaborators

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a naming policy
///
/// These never abort the sink: a failed rename leaves the file intact under
/// its in-use name.
#[derive(Debug, Error)]
pub enum NamingError {
    /// `next_file()`/`current_file()` called before a base directory was set
    #[error("base directory has not been set")]
    NoBaseDirectory,

    /// The active file does not carry the configured in-use extension
    #[error("file {} does not end with in-use extension '.{extension}'", file.display())]
    MissingInUseExtension { file: PathBuf, extension: String },

    /// The active file name is not valid UTF-8
    #[error("file name of {} is not valid UTF-8", .0.display())]
    InvalidFileName(PathBuf),

    /// The creation timestamp pattern is not a valid strftime pattern
    #[error("invalid creation timestamp pattern '{0}'")]
    InvalidPattern(String),

    /// Unknown naming policy type
    #[error("unknown path manager type '{0}'")]
    UnknownType(String),

    /// The finalized name is already taken
    #[error("cannot rename {} to {}: destination exists", from.display(), to.display())]
    DestinationExists { from: PathBuf, to: PathBuf },

    /// Rename failed
    #[error("failed to rename {} to {}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors from the upstream channel
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel cannot accept more events
    #[error("channel '{name}' is full (capacity {capacity})")]
    Full { name: String, capacity: usize },

    /// Transaction method called in the wrong state
    #[error("illegal transaction state: {0}")]
    IllegalState(&'static str),
}

/// Failure inside a drain transaction
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Channel take or commit failed
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Serializer write or stream flush failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Delivery failure returned by a drain loop invocation
///
/// Every variant is fatal to the invocation only; the caller retries later.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Flushing or closing the active file failed during rotation
    #[error("unable to rotate file {} while delivering event", path.display())]
    Rotate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Opening the output stream failed
    #[error("failed to open file {} while delivering event", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The naming policy could not produce a file
    #[error("failed to allocate output file: {0}")]
    Naming(#[from] NamingError),

    /// The batch failed and was rolled back
    #[error("failed to process transaction for file {}", path.display())]
    Transaction {
        path: PathBuf,
        #[source]
        source: TransactionError,
    },

    /// The output directory could not be created
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Timed rotation was configured but no Tokio runtime is running
    #[error("roll interval requires a Tokio runtime")]
    NoRuntime,
}

impl SinkError {
    /// Path of the file involved in the failure, when known
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Rotate { path, .. }
            | Self::Open { path, .. }
            | Self::Transaction { path, .. }
            | Self::CreateDir { path, .. } => Some(path),
            Self::Naming(_) | Self::NoRuntime => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_in_use_extension_message() {
        let err = NamingError::MissingInUseExtension {
            file: PathBuf::from("/out/app1000-1.log"),
            extension: "tmp".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("app1000-1.log"));
        assert!(msg.contains(".tmp"));
    }

    #[test]
    fn test_open_error_carries_path() {
        let err = SinkError::Open {
            path: PathBuf::from("/out/app-1.tmp"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.path(), Some(std::path::Path::new("/out/app-1.tmp")));
        assert!(err.to_string().contains("failed to open file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_transaction_error_from_channel() {
        let err: TransactionError = ChannelError::IllegalState("take before begin").into();
        assert!(err.to_string().contains("take before begin"));
    }

    #[test]
    fn test_naming_error_has_no_path() {
        let err = SinkError::from(NamingError::NoBaseDirectory);
        assert!(err.path().is_none());
        assert!(err.to_string().contains("base directory"));
    }
}
