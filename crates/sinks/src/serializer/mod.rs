//! Event serializers
//!
//! A serializer turns one event into bytes on the active output stream. It
//! is created fresh for every file and gets lifecycle hooks around the
//! file's lifetime:
//!
//! ```text
//! after_create() → write()* → flush() → before_close()
//! ```
//!
//! Serializers are selected by type name through [`SerializerKind`], which
//! produces a [`SerializerFactory`] the sink calls whenever it opens a file.
//!
//! | Type | Output |
//! |------|--------|
//! | `text` | Body bytes, optional trailing newline |
//! | `header_and_text` | `{k=v, ...} body` |
//! | `json` | One JSON object per line |

mod header_and_text;
mod json;
mod text;

pub use header_and_text::HeaderAndTextSerializer;
pub use json::JsonSerializer;
pub use text::TextSerializer;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use crate::event::Event;

/// Encodes events onto an output stream
pub trait EventSerializer: Send {
    /// Called once after the output file is opened
    fn after_create(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    /// Encode one event
    fn write(&mut self, event: &Event, out: &mut dyn Write) -> io::Result<()>;

    /// Push any serializer-internal buffering to `out`
    fn flush(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    /// Called once before the output file is closed
    fn before_close(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

/// Constructor for a fresh serializer per output file
pub type SerializerFactory = Arc<dyn Fn() -> Box<dyn EventSerializer> + Send + Sync>;

/// Options shared by the built-in serializers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Terminate every event with `\n`
    pub append_newline: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            append_newline: true,
        }
    }
}

/// Built-in serializer types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerKind {
    Text,
    HeaderAndText,
    Json,
}

impl SerializerKind {
    /// Factory producing serializers of this kind
    pub fn factory(self, options: SerializerOptions) -> SerializerFactory {
        let append_newline = options.append_newline;
        match self {
            Self::Text => Arc::new(move || -> Box<dyn EventSerializer> {
                Box::new(TextSerializer::new(append_newline))
            }),
            Self::HeaderAndText => Arc::new(move || -> Box<dyn EventSerializer> {
                Box::new(HeaderAndTextSerializer::new(append_newline))
            }),
            Self::Json => {
                Arc::new(|| -> Box<dyn EventSerializer> { Box::new(JsonSerializer::new()) })
            }
        }
    }
}

/// Error for an unrecognized serializer type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown serializer type '{0}'")]
pub struct UnknownSerializer(pub String);

impl FromStr for SerializerKind {
    type Err = UnknownSerializer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "header_and_text" => Ok(Self::HeaderAndText),
            "json" => Ok(Self::Json),
            _ => Err(UnknownSerializer(s.to_string())),
        }
    }
}

impl fmt::Display for SerializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::HeaderAndText => "header_and_text",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(kind: SerializerKind, event: &Event) -> String {
        let factory = kind.factory(SerializerOptions::default());
        let mut serializer = factory();
        let mut out = Vec::new();
        serializer.after_create(&mut out).unwrap();
        serializer.write(event, &mut out).unwrap();
        serializer.flush(&mut out).unwrap();
        serializer.before_close(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("TEXT".parse::<SerializerKind>().unwrap(), SerializerKind::Text);
        assert_eq!(
            "header_and_text".parse::<SerializerKind>().unwrap(),
            SerializerKind::HeaderAndText
        );
        assert_eq!("json".parse::<SerializerKind>().unwrap(), SerializerKind::Json);

        let err = "avro".parse::<SerializerKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown serializer type 'avro'");
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for kind in [
            SerializerKind::Text,
            SerializerKind::HeaderAndText,
            SerializerKind::Json,
        ] {
            assert_eq!(kind.to_string().parse::<SerializerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_factory_produces_independent_serializers() {
        let event = Event::new("hello").with_header("host", "a");
        assert_eq!(encode(SerializerKind::Text, &event), "hello\n");
        assert_eq!(encode(SerializerKind::HeaderAndText, &event), "{host=a} hello\n");
        assert!(encode(SerializerKind::Json, &event).ends_with('\n'));
    }
}
