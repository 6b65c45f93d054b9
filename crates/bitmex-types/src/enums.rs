//! Side, Action and Table enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Book side
///
/// Variant order is load-bearing: `Sell < Buy`, which puts the ask half of a
/// symbol's book ahead of the bid half in every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Ask levels
    Sell,
    /// Bid levels
    Buy,
}

impl Side {
    /// Returns the side name as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sell => "Sell",
            Self::Buy => "Buy",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diff action carried by every table message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Full image for the keys it names, sent right after subscribing
    Partial,
    /// New rows
    Insert,
    /// Changed fields of existing rows
    Update,
    /// Removed rows
    Delete,
}

impl Action {
    /// Returns the action name as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partial => "partial",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partial" => Ok(Self::Partial),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Action string outside {partial, insert, update, delete}
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

/// Tables whose state is reconstructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    /// Full-depth L2 book keyed by level id
    #[serde(rename = "orderBookL2")]
    OrderBookL2,
    /// Instrument reference data
    #[serde(rename = "instrument")]
    Instrument,
}

impl Table {
    /// Returns the table label used in status lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderBookL2 => "orderBookL2",
            Self::Instrument => "instrument",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_order() {
        assert!(Side::Sell < Side::Buy);
    }

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"Buy\"");
        let side: Side = serde_json::from_str("\"Sell\"").unwrap();
        assert_eq!(side, Side::Sell);
        assert!(serde_json::from_str::<Side>("\"buy\"").is_err());
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("partial".parse::<Action>(), Ok(Action::Partial));
        assert_eq!("delete".parse::<Action>(), Ok(Action::Delete));
        assert_eq!(
            "upsert".parse::<Action>(),
            Err(UnknownAction("upsert".to_string()))
        );
    }

    #[test]
    fn test_table_labels() {
        assert_eq!(Table::OrderBookL2.to_string(), "orderBookL2");
        assert_eq!(
            serde_json::to_string(&Table::Instrument).unwrap(),
            "\"instrument\""
        );
    }
}
