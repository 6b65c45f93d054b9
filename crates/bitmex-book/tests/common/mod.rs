//! Common test utilities and fixtures for integration tests
//!
//! Contains sample messages in the shape sent by the BitMEX realtime API

#![allow(dead_code)]

use bitmex_book::{BookStore, Dispatcher, InstrumentStore};
use serde_json::{json, Value};
use std::sync::Arc;

/// Welcome banner sent on connect
pub const INFO_MESSAGE: &str = r#"{
    "info": "Welcome to the BitMEX Realtime API.",
    "version": "2.0.0",
    "timestamp": "2020-01-01T00:00:00.000Z",
    "docs": "https://www.bitmex.com/app/wsAPI",
    "limit": {"remaining": 39}
}"#;

/// Subscription acknowledgement
pub const SUBSCRIBE_ACK: &str = r#"{
    "success": true,
    "subscribe": "orderBookL2:XBTUSD",
    "request": {"op": "subscribe", "args": ["orderBookL2:XBTUSD"]}
}"#;

/// Error reply
pub const ERROR_MESSAGE: &str = r#"{
    "status": 400,
    "error": "Unknown table: orderBook3",
    "meta": {},
    "request": {"op": "subscribe", "args": ["orderBook3"]}
}"#;

/// Instrument partial with a realistic subset of fields
pub const INSTRUMENT_PARTIAL: &str = r#"{
    "table": "instrument",
    "action": "partial",
    "keys": ["symbol"],
    "data": [{
        "symbol": "XBTUSD",
        "rootSymbol": "XBT",
        "state": "Open",
        "typ": "FFWCSX",
        "tickSize": 0.5,
        "lotSize": 100,
        "fundingRate": 0.0001,
        "markPrice": 9000.12,
        "lastPrice": 9000.5
    }]
}"#;

/// Instrument update touching two fields
pub const INSTRUMENT_UPDATE: &str = r#"{
    "table": "instrument",
    "action": "update",
    "data": [{"symbol": "XBTUSD", "markPrice": 9001.37, "lastPrice": 9001}]
}"#;

/// Fresh dispatcher over empty stores
pub fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(BookStore::new()), Arc::new(InstrumentStore::new()))
}

/// Book message with the given action and rows
pub fn book_message(action: &str, data: Value) -> Value {
    json!({"table": "orderBookL2", "action": action, "data": data})
}

/// Instrument message with the given action and rows
pub fn instrument_message(action: &str, data: Value) -> Value {
    json!({"table": "instrument", "action": action, "data": data})
}

/// Full book row
pub fn row(symbol: &str, side: &str, id: u64, price: f64, size: u64) -> Value {
    json!({"symbol": symbol, "side": side, "id": id, "price": price, "size": size})
}

/// Size-only update row
pub fn size_row(symbol: &str, side: &str, id: u64, size: u64) -> Value {
    json!({"symbol": symbol, "side": side, "id": id, "size": size})
}

/// Delete row
pub fn key_row(symbol: &str, side: &str, id: u64) -> Value {
    json!({"symbol": symbol, "side": side, "id": id})
}

/// Book partial for XBTUSD with two levels per side
pub fn xbt_partial() -> Value {
    book_message(
        "partial",
        json!([
            row("XBTUSD", "Sell", 8799000100, 9001.0, 150),
            row("XBTUSD", "Sell", 8799000050, 9001.5, 20),
            row("XBTUSD", "Buy", 8799000150, 9000.5, 300),
            row("XBTUSD", "Buy", 8799000200, 9000.0, 45),
        ]),
    )
}
