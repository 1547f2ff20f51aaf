//! Headers-then-body serializer

use std::io::{self, Write};

use super::EventSerializer;
use crate::event::Event;

/// Writes `{k1=v1, k2=v2} body`, headers ordered by key
#[derive(Debug, Clone)]
pub struct HeaderAndTextSerializer {
    append_newline: bool,
}

impl HeaderAndTextSerializer {
    pub fn new(append_newline: bool) -> Self {
        Self { append_newline }
    }
}

impl EventSerializer for HeaderAndTextSerializer {
    fn write(&mut self, event: &Event, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"{")?;
        for (i, (key, value)) in event.headers().iter().enumerate() {
            if i > 0 {
                out.write_all(b", ")?;
            }
            write!(out, "{key}={value}")?;
        }
        out.write_all(b"} ")?;
        out.write_all(event.body())?;
        if self.append_newline {
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
