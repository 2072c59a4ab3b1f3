//! Order-Book Processor
//!
//! Parses snapshot frames and keeps the latest book.

use costsim_core::{OrderBook, Price};
use rust_decimal::Decimal;

use crate::error::GatewayError;
use crate::messages::OrderBookMessage;

/// Keeps the most recent book built from the feed
#[derive(Debug, Default)]
pub struct OrderBookProcessor {
    current: Option<OrderBook>,
    processed: u64,
}

impl OrderBookProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw JSON frame and make it the current book
    ///
    /// On error the previous book stays current.
    pub fn process_message(&mut self, raw: &str) -> Result<&OrderBook, GatewayError> {
        let message: OrderBookMessage = serde_json::from_str(raw)?;
        self.accept(message)
    }

    /// Same as [`process_message`](Self::process_message) for an already decoded frame
    pub fn process_value(&mut self, value: serde_json::Value) -> Result<&OrderBook, GatewayError> {
        let message: OrderBookMessage = serde_json::from_value(value)?;
        self.accept(message)
    }

    fn accept(&mut self, message: OrderBookMessage) -> Result<&OrderBook, GatewayError> {
        let book = message.into_order_book();
        // The mid must be representable before the book can be costed
        if let (Some(ask), Some(bid)) = (book.best_ask(), book.best_bid()) {
            if ask.price.checked_add(bid.price).is_none() {
                return Err(GatewayError::Parse(format!(
                    "best ask {} + best bid {} overflows",
                    ask.price, bid.price
                )));
            }
        }
        self.processed += 1;
        Ok(self.current.insert(book))
    }

    pub fn current(&self) -> Option<&OrderBook> {
        self.current.as_ref()
    }

    /// Number of frames successfully processed
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// (best ask + best bid) / 2 of the current book
    pub fn mid_price(&self) -> Result<Price, GatewayError> {
        let book = self.current.as_ref().ok_or(GatewayError::NoOrderBook)?;
        match (book.best_ask(), book.best_bid()) {
            (Some(ask), Some(bid)) => ask
                .price
                .checked_add(bid.price)
                .map(|sum| sum / Decimal::TWO)
                .ok_or_else(|| GatewayError::Parse("mid price overflows".to_string())),
            _ => Err(GatewayError::EmptySide),
        }
    }
}
