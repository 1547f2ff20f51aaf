//! Buffered append-only file stream with rollback
//!
//! Wraps the active output file. Writes are buffered in memory and pushed
//! to the file on `flush()`. A drain transaction records `position()`
//! before writing and calls `truncate_to()` if it rolls back, so bytes of
//! an uncommitted batch never survive in the file.
//!
//! # Example
//!
//! ```ignore
//! use rollover_sinks::util::OutputStream;
//!
//! let mut stream = OutputStream::open("/data/app-1.log.tmp", 64 * 1024)?;
//! let checkpoint = stream.position();
//! stream.write_all(b"hello\n")?;
//! if failed {
//!     stream.truncate_to(checkpoint)?;
//! }
//! stream.flush()?;
//! stream.close()?;
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Default write buffer size (64KB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Append-mode file stream with an in-memory write buffer
#[derive(Debug)]
pub struct OutputStream {
    file: File,
    buffer: Vec<u8>,
    capacity: usize,
    /// Bytes currently in the file
    flushed: u64,
}

impl OutputStream {
    /// Open `path` for appending, creating it if missing
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let flushed = file.metadata()?.len();
        Ok(Self {
            file,
            buffer: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            flushed,
        })
    }

    /// Logical end of the stream, including buffered bytes
    pub fn position(&self) -> u64 {
        self.flushed + self.buffer.len() as u64
    }

    /// Discard everything after `position`, buffered or on disk
    pub fn truncate_to(&mut self, position: u64) -> io::Result<()> {
        if position <= self.flushed {
            self.buffer.clear();
            self.file.set_len(position)?;
            self.flushed = position;
            return Ok(());
        }

        self.buffer.truncate((position - self.flushed) as usize);
        // a failed write can leave part of the buffer on disk
        if self.file.metadata()?.len() > self.flushed {
            self.file.set_len(self.flushed)?;
        }
        Ok(())
    }

    /// Flush and fsync, then release the file
    pub fn close(mut self) -> io::Result<()> {
        self.flush()?;
        self.file.sync_all()
    }

    fn write_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.file.write_all(&self.buffer)?;
        self.flushed += self.buffer.len() as u64;
        self.buffer.clear();
        Ok(())
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.buffer.len() + buf.len() > self.capacity {
            self.write_buffer()?;
        }
        if buf.len() >= self.capacity {
            self.file.write_all(buf)?;
            self.flushed += buf.len() as u64;
        } else {
            self.buffer.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.write_buffer()?;
        self.file.flush()
    }
}

#[cfg(test)]
#[path = "output_stream_test.rs"]
mod output_stream_test;
