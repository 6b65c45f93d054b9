//! Order book and instrument state reconstruction for the BitMEX realtime feed
//!
//! This crate applies `partial`/`insert`/`update`/`delete` diffs from the
//! `orderBookL2` and `instrument` tables to in-memory stores and produces
//! deterministic snapshots of them on demand.
//!
//! # Components
//!
//! - [`BookStore`] - L2 levels keyed by `(symbol, side, id)`
//! - [`InstrumentStore`] - schema-less instrument records keyed by symbol
//! - [`Dispatcher`] - routes decoded messages to the right store
//! - [`SnapshotEmitter`] - ordered dumps of both stores
//!
//! The stores are internally locked, so a snapshot timer may run on another
//! thread while the feed thread keeps applying diffs.
//!
//! # Example
//!
//! ```
//! use bitmex_book::{BookStore, Dispatcher, InstrumentStore, SnapshotEmitter};
//! use std::sync::Arc;
//!
//! let book = Arc::new(BookStore::new());
//! let instruments = Arc::new(InstrumentStore::new());
//! let dispatcher = Dispatcher::new(book.clone(), instruments.clone());
//!
//! dispatcher
//!     .dispatch_str(r#"{"table":"orderBookL2","action":"partial","data":[
//!         {"symbol":"XBTUSD","id":8799000000,"side":"Sell","size":10,"price":10000}]}"#)
//!     .unwrap();
//!
//! let snapshot = SnapshotEmitter::emit(0, &book, &instruments);
//! assert_eq!(snapshot.book.len(), 1);
//! ```

pub mod book;
pub mod config;
pub mod dispatch;
pub mod instrument;
pub mod snapshot;

// Re-export main types
pub use book::BookStore;
pub use config::{
    ConfigError, DispatcherConfig, MissingKeyPolicy, DEFAULT_BOOK_TABLE, DEFAULT_INSTRUMENT_TABLE,
};
pub use dispatch::{Dispatched, Dispatcher, Outcome, NO_CHANNEL};
pub use instrument::InstrumentStore;
pub use snapshot::{Snapshot, SnapshotEmitter};
