//! Routing of decoded feed messages into the stores
//!
//! ```text
//! decoded message ─► FeedMessage::classify ─┬─ book table       ─► BookStore
//!                                           ├─ instrument table ─► InstrumentStore
//!                                           ├─ control / passthrough ─► (no mutation)
//!                                           └─ anything else    ─► UnrecognizedChannel
//! ```
//!
//! Every row of a message is decoded before the store is touched, so a
//! malformed message leaves the state exactly as it was.

use crate::{
    book::BookStore,
    config::{ConfigError, DispatcherConfig, MissingKeyPolicy},
    instrument::InstrumentStore,
};
use bitmex_types::{
    Action, BookKey, BookLevel, FeedMessage, InstrumentRecord, SizeUpdate, StateError,
    StateResult, Table,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// Channel label used for messages with no recognizable channel marker
pub const NO_CHANNEL: &str = "<none>";

/// What a dispatched message did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Rows were applied to one of the stores
    Applied {
        /// Table the rows were applied to
        table: Table,
        /// Diff action of the message
        action: Action,
        /// Number of rows in the message
        rows: usize,
    },
    /// Control message or pass-through table, state untouched
    Passthrough,
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Channel label for recording the raw message (table name, `info`,
    /// subscribed topic or `error`)
    pub channel: String,
    /// Effect on the stores
    pub outcome: Outcome,
}

/// Routes decoded messages to the book and instrument stores
///
/// # Example
///
/// ```
/// use bitmex_book::{BookStore, Dispatcher, InstrumentStore};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::new(Arc::new(BookStore::new()), Arc::new(InstrumentStore::new()));
/// let msg = json!({
///     "table": "orderBookL2",
///     "action": "insert",
///     "data": [{"symbol": "XBTUSD", "id": 1, "side": "Buy", "price": 9000.0, "size": 100}]
/// });
/// dispatcher.dispatch(&msg).unwrap();
/// assert_eq!(dispatcher.book().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    book: Arc<BookStore>,
    instruments: Arc<InstrumentStore>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a dispatcher with the default BitMEX table names
    pub fn new(book: Arc<BookStore>, instruments: Arc<InstrumentStore>) -> Self {
        Self {
            book,
            instruments,
            config: DispatcherConfig::default(),
        }
    }

    /// Create a dispatcher with a validated configuration
    pub fn with_config(
        book: Arc<BookStore>,
        instruments: Arc<InstrumentStore>,
        config: DispatcherConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            book,
            instruments,
            config,
        })
    }

    /// Book store this dispatcher writes to
    pub fn book(&self) -> &Arc<BookStore> {
        &self.book
    }

    /// Instrument store this dispatcher writes to
    pub fn instruments(&self) -> &Arc<InstrumentStore> {
        &self.instruments
    }

    /// Active configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Decode a raw text message and dispatch it
    pub fn dispatch_str(&self, text: &str) -> StateResult<Dispatched> {
        let value: Value = serde_json::from_str(text)?;
        self.dispatch(&value)
    }

    /// Dispatch one decoded message
    #[instrument(skip_all)]
    pub fn dispatch(&self, message: &Value) -> StateResult<Dispatched> {
        let classified = FeedMessage::classify(message);
        let channel = classified.channel().unwrap_or(NO_CHANNEL).to_string();

        let outcome = match classified {
            FeedMessage::Table { table, message } => {
                if table == self.config.book_table {
                    self.apply(Table::OrderBookL2, message)?
                } else if table == self.config.instrument_table {
                    self.apply(Table::Instrument, message)?
                } else if self.config.passthrough_tables.contains(table) {
                    trace!(table, "pass-through table");
                    Outcome::Passthrough
                } else {
                    return Err(StateError::unrecognized_channel(table));
                }
            }
            control if control.is_control() => {
                trace!(channel = %channel, "control message");
                Outcome::Passthrough
            }
            _ => return Err(StateError::unrecognized_channel(NO_CHANNEL)),
        };

        Ok(Dispatched { channel, outcome })
    }

    /// Pull `action` and `data` out of a table message and apply the rows
    fn apply(&self, table: Table, message: &Value) -> StateResult<Outcome> {
        let action = message
            .get("action")
            .and_then(Value::as_str)
            .ok_or(StateError::MissingField {
                table,
                field: "action",
            })?;
        let action: Action = action
            .parse()
            .map_err(|_| StateError::UnrecognizedAction {
                table,
                action: action.to_string(),
            })?;
        let data = message
            .get("data")
            .and_then(Value::as_array)
            .ok_or(StateError::MissingField {
                table,
                field: "data",
            })?;

        let result = match table {
            Table::OrderBookL2 => self.apply_book(action, data),
            Table::Instrument => self.apply_instrument(action, data),
        };

        match result {
            Ok(()) => {}
            Err(StateError::KeyNotFound { table, keys })
                if self.config.missing_key_policy == MissingKeyPolicy::Ignore =>
            {
                warn!(%table, %action, missing = keys.len(), "ignoring rows for unknown keys");
            }
            Err(e) => return Err(e),
        }

        debug!(%table, %action, rows = data.len(), "applied");
        Ok(Outcome::Applied {
            table,
            action,
            rows: data.len(),
        })
    }

    fn apply_book(&self, action: Action, data: &[Value]) -> StateResult<()> {
        match action {
            Action::Partial | Action::Insert => {
                let rows: Vec<BookLevel> = decode_rows(Table::OrderBookL2, data)?;
                self.book.apply_partial_or_insert(rows);
            }
            Action::Update => {
                let rows: Vec<SizeUpdate> = decode_rows(Table::OrderBookL2, data)?;
                self.book.apply_update(rows)?;
            }
            Action::Delete => {
                let keys: Vec<BookKey> = decode_rows(Table::OrderBookL2, data)?;
                self.book.apply_delete(keys);
            }
        }
        Ok(())
    }

    fn apply_instrument(&self, action: Action, data: &[Value]) -> StateResult<()> {
        let rows: Vec<InstrumentRecord> = decode_rows(Table::Instrument, data)?;
        match action {
            Action::Partial | Action::Insert => {
                self.instruments.apply_partial_or_insert(rows)?;
            }
            Action::Update => {
                self.instruments.apply_update(rows)?;
            }
            Action::Delete => {
                self.instruments.apply_delete(rows)?;
            }
        }
        Ok(())
    }
}

/// Decode every row of a message, failing on the first bad one
fn decode_rows<T: DeserializeOwned>(table: Table, data: &[Value]) -> StateResult<Vec<T>> {
    data.iter()
        .map(|row| T::deserialize(row).map_err(|source| StateError::InvalidEntry { table, source }))
        .collect()
}
