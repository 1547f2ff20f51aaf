//! Event model
//!
//! An event is an opaque body plus string headers. The body is reference
//! counted (`Bytes`), so moving events between the channel and a
//! transaction never copies payloads.

use std::collections::BTreeMap;

use bytes::Bytes;

/// A single event flowing from the channel to the sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    headers: BTreeMap<String, String>,
    body: Bytes,
}

impl Event {
    /// Create an event with the given body and no headers
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Event headers, ordered by key
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Event body
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl From<&'static str> for Event {
    fn from(body: &'static str) -> Self {
        Self::new(body)
    }
}

impl From<String> for Event {
    fn from(body: String) -> Self {
        Self::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_body_and_headers() {
        let event = Event::new("hello")
            .with_header("host", "web-1")
            .with_header("app", "api");

        assert_eq!(event.body().as_ref(), b"hello");
        let keys: Vec<_> = event.headers().keys().cloned().collect();
        assert_eq!(keys, vec!["app", "host"]);
    }

    #[test]
    fn test_event_from_string() {
        let event = Event::from(String::from("line"));
        assert_eq!(event.body().as_ref(), b"line");
        assert!(event.headers().is_empty());
    }
}
