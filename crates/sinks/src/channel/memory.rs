//! Bounded in-memory channel
//!
//! Taken events are held by the transaction until commit. Rollback puts
//! them back at the front of the queue in their original order, so a
//! retried drain sees exactly the same sequence.
//!
//! Events held by open transactions still count against the capacity, so
//! a rollback can never push the queue past it.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::{Channel, Transaction};
use crate::error::ChannelError;
use crate::event::Event;

/// Default channel capacity
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Bounded in-memory channel
pub struct MemoryChannel {
    name: String,
    capacity: usize,
    queue: Mutex<Queue>,
}

struct Queue {
    events: VecDeque<Event>,
    /// Taken by open transactions, not yet committed or rolled back
    in_flight: usize,
}

impl Queue {
    fn occupied(&self) -> usize {
        self.events.len() + self.in_flight
    }
}

impl MemoryChannel {
    /// Create a channel with the default capacity
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_CAPACITY)
    }

    /// Create a channel holding at most `capacity` queued events
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            queue: Mutex::new(Queue {
                events: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
                in_flight: 0,
            }),
        }
    }

    /// Enqueue an event
    ///
    /// Returns `ChannelError::Full` when queued plus in-flight events
    /// reach the capacity.
    pub fn put(&self, event: Event) -> Result<(), ChannelError> {
        let mut queue = self.queue.lock();
        if queue.occupied() >= self.capacity {
            return Err(ChannelError::Full {
                name: self.name.clone(),
                capacity: self.capacity,
            });
        }
        queue.events.push_back(event);
        Ok(())
    }

    /// Enqueue all events or none of them
    pub fn put_all(&self, events: impl IntoIterator<Item = Event>) -> Result<(), ChannelError> {
        let events: Vec<Event> = events.into_iter().collect();
        let mut queue = self.queue.lock();
        if queue.occupied() + events.len() > self.capacity {
            return Err(ChannelError::Full {
                name: self.name.clone(),
                capacity: self.capacity,
            });
        }
        queue.events.extend(events);
        Ok(())
    }

    /// Number of queued events (excluding events held by open transactions)
    pub fn len(&self) -> usize {
        self.queue.lock().events.len()
    }

    /// Whether no events are queued
    pub fn is_empty(&self) -> bool {
        self.queue.lock().events.is_empty()
    }

    /// Maximum number of queued events
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Channel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn transaction(&self) -> Box<dyn Transaction + '_> {
        Box::new(MemoryTransaction {
            channel: self,
            state: TxState::New,
            taken: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    New,
    Open,
    Completed,
    Closed,
}

struct MemoryTransaction<'a> {
    channel: &'a MemoryChannel,
    state: TxState,
    taken: Vec<Event>,
}

impl MemoryTransaction<'_> {
    fn return_taken(&mut self) {
        if self.taken.is_empty() {
            return;
        }
        let mut queue = self.channel.queue.lock();
        queue.in_flight -= self.taken.len();
        for event in self.taken.drain(..).rev() {
            queue.events.push_front(event);
        }
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn begin(&mut self) -> Result<(), ChannelError> {
        if self.state != TxState::New {
            return Err(ChannelError::IllegalState("begin called twice"));
        }
        self.state = TxState::Open;
        Ok(())
    }

    fn take(&mut self) -> Result<Option<Event>, ChannelError> {
        if self.state != TxState::Open {
            return Err(ChannelError::IllegalState("take outside an open transaction"));
        }
        let mut queue = self.channel.queue.lock();
        let event = queue.events.pop_front();
        if let Some(ref event) = event {
            queue.in_flight += 1;
            self.taken.push(event.clone());
        }
        Ok(event)
    }

    fn commit(&mut self) -> Result<(), ChannelError> {
        if self.state != TxState::Open {
            return Err(ChannelError::IllegalState("commit outside an open transaction"));
        }
        if !self.taken.is_empty() {
            self.channel.queue.lock().in_flight -= self.taken.len();
            self.taken.clear();
        }
        self.state = TxState::Completed;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ChannelError> {
        if self.state != TxState::Open {
            return Err(ChannelError::IllegalState("rollback outside an open transaction"));
        }
        self.return_taken();
        self.state = TxState::Completed;
        Ok(())
    }

    fn close(&mut self) {
        if self.state == TxState::Open && !self.taken.is_empty() {
            tracing::warn!(
                channel = %self.channel.name,
                events = self.taken.len(),
                "transaction closed without commit, rolling back"
            );
            self.return_taken();
        }
        self.state = TxState::Closed;
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if self.state != TxState::Closed {
            self.close();
        }
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
