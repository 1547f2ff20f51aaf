//! JSON lines serializer

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use super::EventSerializer;
use crate::event::Event;

#[derive(Serialize)]
struct JsonEvent<'a> {
    headers: &'a BTreeMap<String, String>,
    body: String,
}

/// Writes one JSON object per event, newline terminated
///
/// Bodies that are not valid UTF-8 are written lossily.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl EventSerializer for JsonSerializer {
    fn write(&mut self, event: &Event, out: &mut dyn Write) -> io::Result<()> {
        let record = JsonEvent {
            headers: event.headers(),
            body: String::from_utf8_lossy(event.body()).into_owned(),
        };
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")
    }
}
