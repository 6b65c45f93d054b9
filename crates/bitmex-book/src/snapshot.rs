//! Point-in-time snapshots of both stores
//!
//! A snapshot is written as one tab-separated status line per table:
//!
//! ```text
//! status <TAB> <timestamp> <TAB> orderBookL2 <TAB> [{"symbol":..,"id":..,"side":..,"price":..,"size":..},..]
//! status <TAB> <timestamp> <TAB> instrument  <TAB> [{..},..]
//! ```
//!
//! The table column carries the subscribed table name, so a dispatcher
//! configured for `orderBookL2_25` writes its book under that label.

use crate::{book::BookStore, dispatch::Dispatcher, instrument::InstrumentStore};
use bitmex_types::{BookLevel, InstrumentRecord, Table};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Full state of both stores at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Caller-supplied timestamp (feed time or wall clock)
    pub timestamp: u64,
    /// Book levels in key order
    pub book: Vec<BookLevel>,
    /// Instrument records in symbol order
    pub instruments: Vec<InstrumentRecord>,
}

impl Snapshot {
    /// Book levels as a JSON array
    pub fn book_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.book)
    }

    /// Instrument records as a JSON array
    pub fn instruments_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.instruments)
    }

    /// Write both status lines under the default BitMEX table names
    pub fn write_status<W: Write>(&self, out: W) -> io::Result<()> {
        self.write_status_as(out, Table::OrderBookL2.as_str(), Table::Instrument.as_str())
    }

    /// Write both status lines under the given table names
    pub fn write_status_as<W: Write>(
        &self,
        mut out: W,
        book_table: &str,
        instrument_table: &str,
    ) -> io::Result<()> {
        write_line(&mut out, self.timestamp, book_table, &self.book)?;
        write_line(&mut out, self.timestamp, instrument_table, &self.instruments)?;
        Ok(())
    }
}

fn write_line<W: Write, T: Serialize>(
    out: &mut W,
    timestamp: u64,
    table: &str,
    rows: &[T],
) -> io::Result<()> {
    write!(out, "status\t{}\t{}\t", timestamp, table)?;
    serde_json::to_writer(&mut *out, rows)?;
    out.write_all(b"\n")
}

/// Stateless snapshot producer
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotEmitter;

impl SnapshotEmitter {
    /// Capture both stores
    ///
    /// Each store is read under its own read lock, so neither half can show
    /// a diff batch half-applied.
    pub fn emit(timestamp: u64, book: &BookStore, instruments: &InstrumentStore) -> Snapshot {
        Snapshot {
            timestamp,
            book: book.snapshot(),
            instruments: instruments.snapshot(),
        }
    }

    /// Capture both stores and write the status lines
    pub fn write_status<W: Write>(
        timestamp: u64,
        book: &BookStore,
        instruments: &InstrumentStore,
        out: W,
    ) -> io::Result<()> {
        Self::emit(timestamp, book, instruments).write_status(out)
    }

    /// Capture a dispatcher's stores and write the status lines labelled
    /// with the table names it is configured for
    pub fn write_dispatcher_status<W: Write>(
        timestamp: u64,
        dispatcher: &Dispatcher,
        out: W,
    ) -> io::Result<()> {
        let config = dispatcher.config();
        Self::emit(timestamp, dispatcher.book(), dispatcher.instruments()).write_status_as(
            out,
            &config.book_table,
            &config.instrument_table,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatcherConfig;
    use bitmex_types::Side;
    use std::sync::Arc;
    use serde_json::json;

    fn stores() -> (BookStore, InstrumentStore) {
        let book = BookStore::new();
        book.apply_partial_or_insert([
            BookLevel::new("XBTUSD", Side::Buy, 2, 9000.0, 100),
            BookLevel::new("XBTUSD", Side::Sell, 1, 9000.5, 30),
        ]);
        let instruments = InstrumentStore::new();
        let record = match json!({"symbol": "XBTUSD", "tickSize": 0.5}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        instruments.apply_partial_or_insert([record]).unwrap();
        (book, instruments)
    }

    #[test]
    fn test_emit_is_idempotent() {
        let (book, instruments) = stores();
        let a = SnapshotEmitter::emit(1, &book, &instruments);
        let b = SnapshotEmitter::emit(1, &book, &instruments);
        assert_eq!(a, b);
        assert_eq!(a.book.len(), 2);
        assert_eq!(a.book[0].side, Side::Sell);
    }

    #[test]
    fn test_status_lines() {
        let (book, instruments) = stores();
        let mut out = Vec::new();
        SnapshotEmitter::write_status(1577836800000000000, &book, &instruments, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "status\t1577836800000000000\torderBookL2\t\
             [{\"symbol\":\"XBTUSD\",\"id\":1,\"side\":\"Sell\",\"price\":9000.5,\"size\":30},\
             {\"symbol\":\"XBTUSD\",\"id\":2,\"side\":\"Buy\",\"price\":9000.0,\"size\":100}]"
        );
        assert_eq!(
            lines[1],
            "status\t1577836800000000000\tinstrument\t[{\"symbol\":\"XBTUSD\",\"tickSize\":0.5}]"
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_status_lines_use_configured_tables() {
        let d = Dispatcher::with_config(
            Arc::new(BookStore::new()),
            Arc::new(InstrumentStore::new()),
            DispatcherConfig::default().with_book_table("orderBookL2_25"),
        )
        .unwrap();
        d.dispatch(&json!({
            "table": "orderBookL2_25",
            "action": "partial",
            "data": [{"symbol": "XBTUSD", "id": 1, "side": "Buy", "price": 9000.0, "size": 1}]
        }))
        .unwrap();

        let mut out = Vec::new();
        SnapshotEmitter::write_dispatcher_status(5, &d, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let labels: Vec<_> = text
            .lines()
            .map(|line| line.split('\t').nth(2).unwrap())
            .collect();
        assert_eq!(labels, ["orderBookL2_25", "instrument"]);
    }

    #[test]
    fn test_empty_stores() {
        let snapshot = SnapshotEmitter::emit(7, &BookStore::new(), &InstrumentStore::new());
        assert_eq!(snapshot.book_json().unwrap(), "[]");
        assert_eq!(snapshot.instruments_json().unwrap(), "[]");
    }
}
