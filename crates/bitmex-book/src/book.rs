//! BTreeMap-based L2 level storage
//!
//! Levels are keyed by [`BookKey`], so a full scan of the map is already in
//! snapshot order and needs no sorting.

use bitmex_types::{BookKey, BookLevel, LevelRecord, Side, SizeUpdate, StateError, StateResult, Symbol, Table};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::warn;

/// L2 book for every subscribed symbol
///
/// All `apply_*` methods hold the write lock for the whole batch and
/// [`snapshot`](Self::snapshot) holds the read lock for the whole scan, so a
/// snapshot observes a batch either completely or not at all.
#[derive(Debug, Default)]
pub struct BookStore {
    levels: RwLock<BTreeMap<BookKey, LevelRecord>>,
}

impl BookStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert rows from a `partial` or `insert` message
    ///
    /// An existing level under the same key is replaced wholesale.
    /// Returns the number of rows applied.
    pub fn apply_partial_or_insert(&self, rows: impl IntoIterator<Item = BookLevel>) -> usize {
        let mut levels = self.levels.write();
        let mut applied = 0;
        for row in rows {
            let (key, record) = row.into_parts();
            levels.insert(key, record);
            applied += 1;
        }
        applied
    }

    /// Set the size of existing levels from an `update` message
    ///
    /// The price of an updated level is never touched. Rows naming an unknown
    /// key are skipped without creating anything; the remaining rows are still
    /// applied and the unknown keys are reported as [`StateError::KeyNotFound`].
    pub fn apply_update(&self, updates: impl IntoIterator<Item = SizeUpdate>) -> StateResult<usize> {
        let mut levels = self.levels.write();
        let mut applied = 0;
        let mut missing = Vec::new();
        for update in updates {
            let (key, size) = update.into_parts();
            match levels.get_mut(&key) {
                Some(record) => {
                    record.size = size;
                    applied += 1;
                }
                None => {
                    warn!(%key, "update for unknown level");
                    missing.push(key);
                }
            }
        }

        if missing.is_empty() {
            Ok(applied)
        } else {
            Err(StateError::key_not_found(Table::OrderBookL2, missing))
        }
    }

    /// Remove levels named by a `delete` message
    ///
    /// Deleting an absent key is a no-op. Returns the number of levels
    /// actually removed.
    pub fn apply_delete(&self, keys: impl IntoIterator<Item = BookKey>) -> usize {
        let mut levels = self.levels.write();
        keys.into_iter()
            .filter(|key| levels.remove(key).is_some())
            .count()
    }

    /// All levels in key order: symbol, then `Sell` before `Buy`, then id
    pub fn snapshot(&self) -> Vec<BookLevel> {
        self.levels
            .read()
            .iter()
            .map(|(key, record)| BookLevel::from_parts(key, record))
            .collect()
    }

    /// Levels of one symbol, in key order
    pub fn levels_for(&self, symbol: &str) -> Vec<BookLevel> {
        let symbol = Symbol::new(symbol);
        let lo = BookKey::new(symbol.clone(), Side::Sell, u64::MIN);
        let hi = BookKey::new(symbol, Side::Buy, u64::MAX);
        self.levels
            .read()
            .range(lo..=hi)
            .map(|(key, record)| BookLevel::from_parts(key, record))
            .collect()
    }

    /// Look up a single level
    pub fn get(&self, key: &BookKey) -> Option<LevelRecord> {
        self.levels.read().get(key).copied()
    }

    /// Distinct symbols with at least one level, ascending
    pub fn symbols(&self) -> Vec<Symbol> {
        let levels = self.levels.read();
        let mut symbols: Vec<Symbol> = Vec::new();
        for key in levels.keys() {
            if symbols.last() != Some(&key.symbol) {
                symbols.push(key.symbol.clone());
            }
        }
        symbols
    }

    /// Total number of levels
    pub fn len(&self) -> usize {
        self.levels.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.levels.read().is_empty()
    }

    /// Clear all levels
    pub fn clear(&self) {
        self.levels.write().clear();
    }
}
