//! Instrument reference data storage
//!
//! Instrument rows have no fixed schema: BitMEX adds fields over time and
//! `update` messages carry only the fields that changed. Records are kept as
//! plain JSON objects and merged one top-level field at a time.

use bitmex_types::{InstrumentRecord, StateError, StateResult, Symbol, Table};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Instrument records keyed by symbol
#[derive(Debug, Default)]
pub struct InstrumentStore {
    records: RwLock<BTreeMap<Symbol, InstrumentRecord>>,
}

/// Extract the `symbol` field every instrument row must carry
fn symbol_of(record: &InstrumentRecord) -> StateResult<Symbol> {
    match record.get("symbol") {
        Some(Value::String(s)) => Ok(Symbol::new(s.as_str())),
        _ => Err(StateError::MissingField {
            table: Table::Instrument,
            field: "symbol",
        }),
    }
}

/// Pair every row with its symbol, failing before anything is applied
fn keyed(rows: impl IntoIterator<Item = InstrumentRecord>) -> StateResult<Vec<(Symbol, InstrumentRecord)>> {
    rows.into_iter()
        .map(|row| symbol_of(&row).map(|symbol| (symbol, row)))
        .collect()
}

impl InstrumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whole records from a `partial` or `insert` message
    ///
    /// Fields of a previous record under the same symbol are discarded.
    pub fn apply_partial_or_insert(
        &self,
        rows: impl IntoIterator<Item = InstrumentRecord>,
    ) -> StateResult<usize> {
        let rows = keyed(rows)?;
        let mut records = self.records.write();
        let applied = rows.len();
        for (symbol, row) in rows {
            records.insert(symbol, row);
        }
        Ok(applied)
    }

    /// Merge changed fields from an `update` message
    ///
    /// Each top-level field of the row overwrites (or adds) the same field of
    /// the stored record; fields the row does not name are left alone. Rows
    /// for unknown symbols are reported as [`StateError::KeyNotFound`] after
    /// the other rows are merged.
    pub fn apply_update(
        &self,
        rows: impl IntoIterator<Item = InstrumentRecord>,
    ) -> StateResult<usize> {
        let rows = keyed(rows)?;
        let mut records = self.records.write();
        let mut applied = 0;
        let mut missing = Vec::new();
        for (symbol, row) in rows {
            match records.get_mut(&symbol) {
                Some(record) => {
                    record.extend(row);
                    applied += 1;
                }
                None => {
                    warn!(%symbol, "instrument update before partial");
                    missing.push(symbol);
                }
            }
        }

        if missing.is_empty() {
            Ok(applied)
        } else {
            Err(StateError::key_not_found(Table::Instrument, missing))
        }
    }

    /// Remove records named by a `delete` message
    ///
    /// BitMEX deletes instruments when contracts expire. Unlike book levels,
    /// deleting an unknown instrument is reported as
    /// [`StateError::KeyNotFound`].
    pub fn apply_delete(
        &self,
        rows: impl IntoIterator<Item = InstrumentRecord>,
    ) -> StateResult<usize> {
        let rows = keyed(rows)?;
        let mut records = self.records.write();
        let mut removed = 0;
        let mut missing = Vec::new();
        for (symbol, _) in rows {
            if records.remove(&symbol).is_some() {
                removed += 1;
            } else {
                warn!(%symbol, "delete for unknown instrument");
                missing.push(symbol);
            }
        }

        if missing.is_empty() {
            Ok(removed)
        } else {
            Err(StateError::key_not_found(Table::Instrument, missing))
        }
    }

    /// All records ordered by symbol ascending
    pub fn snapshot(&self) -> Vec<InstrumentRecord> {
        self.records.read().values().cloned().collect()
    }

    /// Look up one record
    pub fn get(&self, symbol: &str) -> Option<InstrumentRecord> {
        self.records.read().get(symbol).cloned()
    }

    /// Tracked symbols, ascending
    pub fn symbols(&self) -> Vec<Symbol> {
        self.records.read().keys().cloned().collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Clear all records
    pub fn clear(&self) {
        self.records.write().clear();
    }
}
