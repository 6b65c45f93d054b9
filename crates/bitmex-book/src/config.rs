//! Dispatcher configuration
//!
//! # Example
//!
//! ```
//! use bitmex_book::{DispatcherConfig, MissingKeyPolicy};
//!
//! let config = DispatcherConfig::default()
//!     .with_book_table("orderBookL2_25")
//!     .with_passthrough_tables(["trade", "quote"])
//!     .with_missing_key_policy(MissingKeyPolicy::Ignore);
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeSet;

/// Default BitMEX table for the full-depth L2 book
pub const DEFAULT_BOOK_TABLE: &str = "orderBookL2";

/// Default BitMEX table for instrument reference data
pub const DEFAULT_INSTRUMENT_TABLE: &str = "instrument";

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A table name was empty
    #[error("table names must not be empty")]
    EmptyTableName,

    /// The same table was configured for two roles
    #[error("table {table:?} is configured more than once")]
    DuplicateTable { table: String },
}

/// What to do when an update or delete names a key the store does not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Return [`StateError::KeyNotFound`](bitmex_types::StateError::KeyNotFound)
    #[default]
    Error,
    /// Log a warning and report success
    Ignore,
}

/// Routing configuration for [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Table routed to the book store
    pub book_table: String,
    /// Table routed to the instrument store
    pub instrument_table: String,
    /// Subscribed tables that are recognized but not reconstructed
    pub passthrough_tables: BTreeSet<String>,
    /// Handling of updates for unknown keys
    pub missing_key_policy: MissingKeyPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            book_table: DEFAULT_BOOK_TABLE.to_string(),
            instrument_table: DEFAULT_INSTRUMENT_TABLE.to_string(),
            passthrough_tables: BTreeSet::new(),
            missing_key_policy: MissingKeyPolicy::default(),
        }
    }
}

impl DispatcherConfig {
    /// Set the book table name
    pub fn with_book_table(mut self, table: impl Into<String>) -> Self {
        self.book_table = table.into();
        self
    }

    /// Set the instrument table name
    pub fn with_instrument_table(mut self, table: impl Into<String>) -> Self {
        self.instrument_table = table.into();
        self
    }

    /// Add one pass-through table
    pub fn with_passthrough_table(mut self, table: impl Into<String>) -> Self {
        self.passthrough_tables.insert(table.into());
        self
    }

    /// Add several pass-through tables
    pub fn with_passthrough_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passthrough_tables
            .extend(tables.into_iter().map(Into::into));
        self
    }

    /// Set the missing-key policy
    pub fn with_missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key_policy = policy;
        self
    }

    /// Check that every table name is non-empty and has a single role
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tracked = [&self.book_table, &self.instrument_table];
        if tracked
            .iter()
            .copied()
            .chain(self.passthrough_tables.iter())
            .any(|t| t.is_empty())
        {
            return Err(ConfigError::EmptyTableName);
        }
        if self.book_table == self.instrument_table {
            return Err(ConfigError::DuplicateTable {
                table: self.book_table.clone(),
            });
        }
        if let Some(table) = tracked
            .into_iter()
            .find(|t| self.passthrough_tables.contains(t.as_str()))
        {
            return Err(ConfigError::DuplicateTable {
                table: table.clone(),
            });
        }
        Ok(())
    }
}
