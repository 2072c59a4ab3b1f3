//! Market data message types
//!
//! One JSON text frame per snapshot:
//!
//! ```text
//! {"timestamp": "2024-03-20T10:00:00Z", "exchange": "OKX", "symbol": "BTC-USDT-SWAP",
//!  "asks": [["50000.0", "1.0"], ...], "bids": [["49999.0", "1.5"], ...]}
//! ```

use chrono::{DateTime, Utc};
use costsim_core::{OrderBook, OrderBookLevel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `[price, quantity]` pair, decimal strings on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireLevel(pub Decimal, pub Decimal);

impl From<WireLevel> for OrderBookLevel {
    fn from(level: WireLevel) -> Self {
        OrderBookLevel::new(level.0, level.1)
    }
}

impl From<&OrderBookLevel> for WireLevel {
    fn from(level: &OrderBookLevel) -> Self {
        WireLevel(level.price, level.quantity)
    }
}

/// Full level-2 snapshot frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookMessage {
    /// RFC 3339, `Z` suffix accepted
    pub timestamp: DateTime<Utc>,
    pub exchange: String,
    pub symbol: String,
    pub asks: Vec<WireLevel>,
    pub bids: Vec<WireLevel>,
}

impl OrderBookMessage {
    pub fn into_order_book(self) -> OrderBook {
        OrderBook {
            timestamp: self.timestamp,
            exchange: self.exchange,
            symbol: self.symbol,
            asks: self.asks.into_iter().map(Into::into).collect(),
            bids: self.bids.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&OrderBook> for OrderBookMessage {
    fn from(book: &OrderBook) -> Self {
        Self {
            timestamp: book.timestamp,
            exchange: book.exchange.clone(),
            symbol: book.symbol.clone(),
            asks: book.asks.iter().map(Into::into).collect(),
            bids: book.bids.iter().map(Into::into).collect(),
        }
    }
}
