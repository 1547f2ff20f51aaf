//! Body-only serializer

use std::io::{self, Write};

use super::EventSerializer;
use crate::event::Event;

/// Writes the raw event body, optionally followed by a newline
///
/// Headers are dropped.
#[derive(Debug, Clone)]
pub struct TextSerializer {
    append_newline: bool,
}

impl TextSerializer {
    pub fn new(append_newline: bool) -> Self {
        Self { append_newline }
    }
}

impl Default for TextSerializer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EventSerializer for TextSerializer {
    fn write(&mut self, event: &Event, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(event.body())?;
        if self.append_newline {
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_with_newline() {
        let mut serializer = TextSerializer::default();
        let mut out = Vec::new();
        serializer.write(&Event::from("a"), &mut out).unwrap();
        serializer.write(&Event::from("b"), &mut out).unwrap();
        assert_eq!(out, b"a\nb\n");
    }

    #[test]
    fn test_text_without_newline() {
        let mut serializer = TextSerializer::new(false);
        let mut out = Vec::new();
        serializer
            .write(&Event::new("raw").with_header("ignored", "yes"), &mut out)
            .unwrap();
        assert_eq!(out, b"raw");
    }

    #[test]
    fn test_text_binary_body_passes_through() {
        let mut serializer = TextSerializer::new(false);
        let mut out = Vec::new();
        serializer
            .write(&Event::new(vec![0u8, 159, 146, 150]), &mut out)
            .unwrap();
        assert_eq!(out, vec![0u8, 159, 146, 150]);
    }
}
