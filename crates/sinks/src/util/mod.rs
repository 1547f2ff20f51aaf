//! Sink utilities
//!
//! - **output_stream**: Buffered append-only file stream that can roll
//!   back the bytes of a failed batch
//! - **rate_limited_logger**: Failure logging that stays quiet while a sink
//!   retries against a persistent error

pub mod output_stream;
pub mod rate_limited_logger;

pub use output_stream::{DEFAULT_BUFFER_SIZE, OutputStream};
pub use rate_limited_logger::{DEFAULT_LOG_INTERVAL, RateLimitedLogger};
