//! Rollover - Sinks
//!
//! Durable rotating file sink for a streaming event pipeline.
//!
//! # Architecture
//!
//! The sink drains bounded batches from a transactional channel, writes
//! them through a pluggable serializer, and periodically promotes the
//! active file from its in-use name to its final name.
//!
//! ```text
//! [Roller] --flag--> [RollingFileSink::process()]
//!                           │
//!      [Channel] ←take/commit/rollback→ [Serializer] → [OutputStream] → app1000-1.log.tmp
//!                           │
//!                    [PathManager::rotate()] → app1000-1.log
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rollover_sinks::channel::MemoryChannel;
//! use rollover_sinks::path_manager::{NamingOptions, PathManagerKind};
//! use rollover_sinks::rolling_file::{RollingFileConfig, RollingFileSink, SinkRunner};
//! use rollover_sinks::serializer::{SerializerKind, SerializerOptions};
//!
//! let channel = Arc::new(MemoryChannel::new("stdin"));
//! let sink = RollingFileSink::new(
//!     "files",
//!     RollingFileConfig::new("/data/out"),
//!     channel.clone(),
//!     PathManagerKind::Rolling.build(NamingOptions::default())?,
//!     SerializerKind::Text.factory(SerializerOptions::default()),
//! );
//!
//! tokio::spawn(SinkRunner::new(sink, Default::default()).run(cancel));
//! ```

/// Transactional channel abstraction and in-memory implementation
pub mod channel;

/// Error types (naming, channel, delivery)
pub mod error;

/// Event model
pub mod event;

/// File naming policies
pub mod path_manager;

/// Rolling file sink, rotation timer and driver
pub mod rolling_file;

/// Event serializers
pub mod serializer;

/// Output stream and logging helpers
pub mod util;

// =============================================================================
// Public re-exports
// =============================================================================

pub use channel::{Channel, MemoryChannel, Transaction};
pub use error::{ChannelError, NamingError, SinkError, TransactionError};
pub use event::Event;
pub use path_manager::{NamingOptions, PathManager, PathManagerKind};
pub use rolling_file::{
    BackoffPolicy, RollingFileConfig, RollingFileSink, RollingFileSinkMetricsHandle, SinkRunner,
    Status,
};
pub use serializer::{EventSerializer, SerializerFactory, SerializerKind, SerializerOptions};
