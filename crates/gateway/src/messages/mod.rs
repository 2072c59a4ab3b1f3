//! Wire message types for gateway communication
//!
//! JSON as sent by the exchange feed, before normalisation to domain types.

pub mod market_data;

pub use market_data::{OrderBookMessage, WireLevel};
