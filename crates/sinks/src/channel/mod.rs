//! Upstream transactional channel
//!
//! The sink never owns the queue it drains. It only uses it through a
//! transaction:
//!
//! ```text
//! begin() → take()* → commit() | rollback() → close()
//! ```
//!
//! Events taken inside a transaction are returned to the channel by
//! `rollback()` and only leave the channel for good on `commit()`.
//!
//! [`MemoryChannel`] is a bounded in-memory implementation used by the
//! binary and tests.

mod memory;

pub use memory::MemoryChannel;

use crate::error::ChannelError;
use crate::event::Event;

/// A source of events that hands them out transactionally
pub trait Channel: Send + Sync {
    /// Channel name for logging
    fn name(&self) -> &str;

    /// Create a new, not yet begun transaction
    fn transaction(&self) -> Box<dyn Transaction + '_>;
}

/// A unit of work against a [`Channel`]
pub trait Transaction {
    /// Start the transaction
    fn begin(&mut self) -> Result<(), ChannelError>;

    /// Take the next event without blocking; `None` when the channel is
    /// currently empty
    fn take(&mut self) -> Result<Option<Event>, ChannelError>;

    /// Permanently remove every taken event from the channel
    fn commit(&mut self) -> Result<(), ChannelError>;

    /// Return every taken event to the channel
    fn rollback(&mut self) -> Result<(), ChannelError>;

    /// Release the transaction
    fn close(&mut self);
}
