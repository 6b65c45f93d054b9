//! Classification of decoded realtime messages
//!
//! BitMEX does not tag its messages with a type field; the kind is implied
//! by which top-level key is present:
//!
//! | Key         | Kind                      | Channel label      |
//! |-------------|---------------------------|--------------------|
//! | `table`     | table data (diff)         | table name         |
//! | `info`      | welcome banner            | `info`             |
//! | `subscribe` | subscription ack          | subscribed topic   |
//! | `error`     | error reply               | `error`            |

use serde_json::Value;

/// Borrowed view of one decoded feed message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedMessage<'a> {
    /// Table data; `table` names the topic, the whole message is kept
    /// so the dispatcher can pull `action` and `data`
    Table {
        /// Table name, e.g. `orderBookL2`
        table: &'a str,
        /// The full message object
        message: &'a Value,
    },
    /// Connection banner
    Info,
    /// Subscription acknowledgement for `topic`
    Subscribe {
        /// Subscribed topic, e.g. `orderBookL2:XBTUSD`
        topic: &'a str,
    },
    /// Error reply from the server
    Error,
    /// None of the known markers present
    Unknown,
}

impl<'a> FeedMessage<'a> {
    /// Classify a decoded message by its top-level keys
    pub fn classify(value: &'a Value) -> Self {
        if let Some(table) = value.get("table").and_then(Value::as_str) {
            return Self::Table {
                table,
                message: value,
            };
        }
        if value.get("info").is_some() {
            return Self::Info;
        }
        if let Some(topic) = value.get("subscribe").and_then(Value::as_str) {
            return Self::Subscribe { topic };
        }
        if value.get("error").is_some() {
            return Self::Error;
        }
        Self::Unknown
    }

    /// Channel label used when recording this message
    pub fn channel(&self) -> Option<&'a str> {
        match self {
            Self::Table { table, .. } => Some(*table),
            Self::Info => Some("info"),
            Self::Subscribe { topic } => Some(*topic),
            Self::Error => Some("error"),
            Self::Unknown => None,
        }
    }

    /// Returns true for info, subscribe-ack and error messages
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Info | Self::Subscribe { .. } | Self::Error)
    }
}
