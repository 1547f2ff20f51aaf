//! Line reader feeding the in-memory channel
//!
//! Every input line becomes one event (without its line terminator). When
//! the channel is full the reader waits for the sink to catch up instead of
//! dropping lines.

use std::time::Duration;

use rollover_sinks::{Channel, ChannelError, Event, MemoryChannel};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Wait between retries while the channel is full
const FULL_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Copy lines from `reader` into `channel` until EOF or cancellation
///
/// Returns the number of lines enqueued.
pub async fn pump_lines<R>(
    reader: R,
    channel: &MemoryChannel,
    cancel: &CancellationToken,
) -> io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0u64;

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        // clone only bumps the body refcount
        let event = Event::from(line);
        loop {
            match channel.put(event.clone()) {
                Ok(()) => break,
                Err(ChannelError::Full { .. }) => {
                    debug!(channel = channel.name(), "channel full, waiting");
                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(count),
                        _ = tokio::time::sleep(FULL_RETRY_DELAY) => {}
                    }
                }
                Err(e) => return Err(io::Error::other(e)),
            }
        }
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(channel: &MemoryChannel) -> Vec<String> {
        let mut tx = channel.transaction();
        tx.begin().unwrap();
        let mut out = Vec::new();
        while let Some(event) = tx.take().unwrap() {
            out.push(String::from_utf8(event.body().to_vec()).unwrap());
        }
        tx.commit().unwrap();
        tx.close();
        out
    }

    #[tokio::test]
    async fn test_pump_lines_until_eof() {
        let channel = MemoryChannel::new("stdin");
        let input: &[u8] = b"first\nsecond\r\nthird";

        let count = pump_lines(input, &channel, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(bodies(&channel), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_pump_lines_stops_on_cancel() {
        let channel = MemoryChannel::new("stdin");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (_writer, reader) = tokio::io::duplex(64);
        let count = pump_lines(io::BufReader::new(reader), &channel, &cancel)
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(channel.is_empty());
    }

    #[tokio::test]
    async fn test_pump_lines_waits_while_full() {
        let channel = MemoryChannel::with_capacity("stdin", 1);
        let cancel = CancellationToken::new();
        let input: &[u8] = b"a\nb\n";

        let pump = pump_lines(input, &channel, &cancel);
        let drain = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            let first = bodies(&channel);
            tokio::time::sleep(Duration::from_millis(30)).await;
            first
        };
        let (count, first) = tokio::join!(pump, drain);

        assert_eq!(count.unwrap(), 2);
        assert_eq!(first, vec!["a"]);
        assert_eq!(bodies(&channel), vec!["b"]);
    }
}
