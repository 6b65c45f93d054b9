//! Error types for the state engine

use crate::Table;
use thiserror::Error;

/// Errors returned while applying feed messages to the stores.
///
/// Every variant is local to the offending message: the caller decides
/// whether to drop it, log it or escalate.
#[derive(Error, Debug)]
pub enum StateError {
    // === State Errors ===
    /// Update (or instrument delete) referenced rows that do not exist
    #[error("{table}: no such key(s): {}", .keys.join(", "))]
    KeyNotFound { table: Table, keys: Vec<String> },

    // === Protocol Errors ===
    /// Action outside {partial, insert, update, delete}
    #[error("{table}: unrecognized action {action:?}")]
    UnrecognizedAction { table: Table, action: String },

    /// Message channel matched neither a tracked table nor a control message
    #[error("unrecognized channel: {channel}")]
    UnrecognizedChannel { channel: String },

    /// A `data` row did not have the shape its action requires
    #[error("{table}: invalid entry: {source}")]
    InvalidEntry {
        table: Table,
        #[source]
        source: serde_json::Error,
    },

    /// `action`, `data` or a row's `symbol` missing or of the wrong type
    #[error("{table}: missing or malformed field {field:?}")]
    MissingField { table: Table, field: &'static str },

    /// Raw message text was not JSON
    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What the caller should do about a failed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Drop the message, state is intact
    Skip,
    /// State diverged from the exchange, resubscribe for a fresh partial
    Resync,
}

impl StateError {
    /// Returns true if the message itself violated the feed protocol
    pub fn is_protocol_violation(&self) -> bool {
        !matches!(self, Self::KeyNotFound { .. })
    }

    /// Get the recovery strategy for this error
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::KeyNotFound { .. } => Recovery::Resync,
            _ => Recovery::Skip,
        }
    }

    /// Table the error relates to, if any
    pub fn table(&self) -> Option<Table> {
        match self {
            Self::KeyNotFound { table, .. }
            | Self::UnrecognizedAction { table, .. }
            | Self::InvalidEntry { table, .. }
            | Self::MissingField { table, .. } => Some(*table),
            Self::UnrecognizedChannel { .. } | Self::Decode(_) => None,
        }
    }

    /// Create a key-not-found error from the missing keys
    pub fn key_not_found<K: ToString>(table: Table, keys: impl IntoIterator<Item = K>) -> Self {
        Self::KeyNotFound {
            table,
            keys: keys.into_iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Create an unrecognized channel error
    pub fn unrecognized_channel(channel: impl Into<String>) -> Self {
        Self::UnrecognizedChannel {
            channel: channel.into(),
        }
    }
}

/// Result type alias for state engine operations
pub type StateResult<T> = Result<T, StateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BookKey, Side};

    #[test]
    fn test_key_not_found_message() {
        let err = StateError::key_not_found(
            Table::OrderBookL2,
            [BookKey::new("XBTUSD", Side::Buy, 99), BookKey::new("XBTUSD", Side::Sell, 3)],
        );
        assert_eq!(
            err.to_string(),
            "orderBookL2: no such key(s): XBTUSD:Buy:99, XBTUSD:Sell:3"
        );
        assert_eq!(err.recovery(), Recovery::Resync);
        assert!(!err.is_protocol_violation());
    }

    #[test]
    fn test_protocol_violations_are_skipped() {
        let err = StateError::UnrecognizedAction {
            table: Table::Instrument,
            action: "upsert".into(),
        };
        assert!(err.is_protocol_violation());
        assert_eq!(err.recovery(), Recovery::Skip);
        assert_eq!(err.table(), Some(Table::Instrument));

        let err = StateError::unrecognized_channel("<none>");
        assert!(err.is_protocol_violation());
        assert_eq!(err.table(), None);
    }

    #[test]
    fn test_decode_from_serde() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: StateError = source.into();
        assert!(matches!(err, StateError::Decode(_)));
        assert_eq!(err.recovery(), Recovery::Skip);
    }
}
