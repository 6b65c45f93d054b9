//! Book level keys, records and the row shapes the feed sends for them

use crate::{Side, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key of one L2 level: `(symbol, side, id)`.
///
/// The derived ordering compares fields in declaration order, so a sorted
/// map of keys iterates by symbol, then `Sell` before `Buy`, then id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookKey {
    /// Instrument symbol
    pub symbol: Symbol,
    /// Book side
    pub side: Side,
    /// Exchange-assigned level id
    pub id: u64,
}

impl BookKey {
    /// Create a new key
    pub fn new(symbol: impl Into<Symbol>, side: Side, id: u64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            id,
        }
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.symbol, self.side, self.id)
    }
}

/// Mutable payload stored under a [`BookKey`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Level price
    pub price: f64,
    /// Contracts resting at this level
    pub size: u64,
}

impl LevelRecord {
    /// Create a new level record
    pub fn new(price: f64, size: u64) -> Self {
        Self { price, size }
    }
}

/// Row of a `partial`/`insert` book message, also the snapshot row shape.
///
/// Field order matches the recorder's output: `symbol, id, side, price, size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Instrument symbol
    pub symbol: Symbol,
    /// Exchange-assigned level id
    pub id: u64,
    /// Book side
    pub side: Side,
    /// Level price
    pub price: f64,
    /// Contracts resting at this level
    pub size: u64,
}

impl BookLevel {
    /// Create a new level row
    pub fn new(symbol: impl Into<Symbol>, side: Side, id: u64, price: f64, size: u64) -> Self {
        Self {
            symbol: symbol.into(),
            id,
            side,
            price,
            size,
        }
    }

    /// Split into key and record
    pub fn into_parts(self) -> (BookKey, LevelRecord) {
        (
            BookKey {
                symbol: self.symbol,
                side: self.side,
                id: self.id,
            },
            LevelRecord {
                price: self.price,
                size: self.size,
            },
        )
    }

    /// Rebuild a row from a stored key and record
    pub fn from_parts(key: &BookKey, record: &LevelRecord) -> Self {
        Self {
            symbol: key.symbol.clone(),
            id: key.id,
            side: key.side,
            price: record.price,
            size: record.size,
        }
    }

    /// Key of this row
    pub fn key(&self) -> BookKey {
        BookKey::new(self.symbol.clone(), self.side, self.id)
    }
}

/// Row of an `update` book message. Any `price` sent along is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeUpdate {
    /// Instrument symbol
    pub symbol: Symbol,
    /// Book side
    pub side: Side,
    /// Exchange-assigned level id
    pub id: u64,
    /// New size
    pub size: u64,
}

impl SizeUpdate {
    /// Create a new size update
    pub fn new(symbol: impl Into<Symbol>, side: Side, id: u64, size: u64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            id,
            size,
        }
    }

    /// Split into key and new size
    pub fn into_parts(self) -> (BookKey, u64) {
        (
            BookKey {
                symbol: self.symbol,
                side: self.side,
                id: self.id,
            },
            self.size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order() {
        let mut keys = vec![
            BookKey::new("XBTUSD", Side::Buy, 1),
            BookKey::new("XBTUSD", Side::Sell, 9),
            BookKey::new("ETHUSD", Side::Buy, 5),
            BookKey::new("XBTUSD", Side::Sell, 2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                BookKey::new("ETHUSD", Side::Buy, 5),
                BookKey::new("XBTUSD", Side::Sell, 2),
                BookKey::new("XBTUSD", Side::Sell, 9),
                BookKey::new("XBTUSD", Side::Buy, 1),
            ]
        );
    }

    #[test]
    fn test_key_display() {
        assert_eq!(BookKey::new("XBTUSD", Side::Buy, 42).to_string(), "XBTUSD:Buy:42");
    }

    #[test]
    fn test_book_level_from_feed_row() {
        let json = r#"{"symbol":"XBTUSD","id":8799000000,"side":"Sell","size":120,"price":10000.5}"#;
        let level: BookLevel = serde_json::from_str(json).unwrap();
        assert_eq!(level, BookLevel::new("XBTUSD", Side::Sell, 8799000000, 10000.5, 120));
    }

    #[test]
    fn test_book_level_field_order() {
        let level = BookLevel::new("XBTUSD", Side::Buy, 1, 9000.0, 100);
        let json = serde_json::to_string(&level).unwrap();
        assert_eq!(
            json,
            r#"{"symbol":"XBTUSD","id":1,"side":"Buy","price":9000.0,"size":100}"#
        );
    }

    #[test]
    fn test_insert_row_requires_price() {
        let json = r#"{"symbol":"XBTUSD","id":1,"side":"Buy","size":100}"#;
        assert!(serde_json::from_str::<BookLevel>(json).is_err());
    }

    #[test]
    fn test_update_row_ignores_price() {
        let json = r#"{"symbol":"XBTUSD","id":1,"side":"Buy","size":50,"price":1.0}"#;
        let update: SizeUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update, SizeUpdate::new("XBTUSD", Side::Buy, 1, 50));
    }

    #[test]
    fn test_delete_row_decodes_to_key() {
        let json = r#"{"symbol":"XBTUSD","id":7,"side":"Sell"}"#;
        let key: BookKey = serde_json::from_str(json).unwrap();
        assert_eq!(key, BookKey::new("XBTUSD", Side::Sell, 7));
    }
}
