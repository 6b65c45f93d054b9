//! Instrument symbols (XBTUSD, ETHUSD, ...)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instrument symbol as sent by BitMEX.
///
/// Immutable once constructed: there is no way to mutate the inner string,
/// so a `Symbol` embedded in a map key can never drift from the position it
/// was sorted into. Ordering is plain byte order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol from a string
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_conversions() {
        let symbol = Symbol::from("XBTUSD");
        assert_eq!(symbol.as_str(), "XBTUSD");
        assert_eq!(symbol.to_string(), "XBTUSD");
        assert_eq!(Symbol::from(String::from("XBTUSD")), symbol);
    }

    #[test]
    fn test_symbol_not_truncated() {
        let long = "X".repeat(4096);
        let symbol = Symbol::new(long.clone());
        assert_eq!(symbol.as_str().len(), 4096);
        assert_eq!(symbol.as_str(), long);
    }

    #[test]
    fn test_symbol_ordering_is_byte_order() {
        let mut symbols = vec![Symbol::new("XBTUSD"), Symbol::new("ETHUSD"), Symbol::new("XBTM25")];
        symbols.sort();
        let names: Vec<_> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, ["ETHUSD", "XBTM25", "XBTUSD"]);
    }

    #[test]
    fn test_symbol_serde() {
        let symbol = Symbol::new("ETHUSD");
        let json = serde_json::to_string(&symbol).unwrap();
        assert_eq!(json, "\"ETHUSD\"");

        let parsed: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, symbol);
    }
}
