//! Shared types for the BitMEX realtime feed state engine
//!
//! This crate provides the core type definitions used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Symbol`] - Instrument symbols (e.g., "XBTUSD")
//! - [`BookKey`], [`LevelRecord`], [`BookLevel`] - L2 level key, payload and row
//! - [`Side`], [`Action`], [`Table`] - Feed enums
//! - [`FeedMessage`] - Classified decoded message
//! - [`StateError`] - Error types

pub mod enums;
pub mod error;
pub mod level;
pub mod messages;
pub mod symbol;

// Re-export commonly used types
pub use enums::*;
pub use error::*;
pub use level::*;
pub use messages::*;
pub use symbol::*;

/// Instrument record: an open JSON object keyed by field name
pub type InstrumentRecord = serde_json::Map<String, serde_json::Value>;
