use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{Price, Quantity, Symbol, Timestamp};

/// One price level of a level-2 book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl OrderBookLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }

    pub fn notional(&self) -> Decimal {
        self.price.saturating_mul(self.quantity)
    }
}

/// Level-2 order book snapshot
///
/// Asks are ordered best (lowest) first, bids best (highest) first, as the
/// exchange sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub timestamp: Timestamp,
    pub exchange: String,
    pub symbol: Symbol,
    pub asks: Vec<OrderBookLevel>,
    pub bids: Vec<OrderBookLevel>,
}

impl OrderBook {
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// (best ask + best bid) / 2, zero when either side is empty or the
    /// sum does not fit in a `Decimal`
    pub fn mid_price(&self) -> Price {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => ask
                .price
                .checked_add(bid.price)
                .map_or(Decimal::ZERO, |sum| sum / Decimal::TWO),
            _ => Decimal::ZERO,
        }
    }

    /// best ask - best bid, zero when either side is empty or out of range
    pub fn spread(&self) -> Price {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => ask.price.checked_sub(bid.price).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    /// Average resting quantity per side
    pub fn depth(&self) -> Quantity {
        self.total_volume() / Decimal::TWO
    }

    /// Resting quantity on both sides, saturating at `Decimal::MAX`
    pub fn total_volume(&self) -> Quantity {
        side_volume(&self.asks).saturating_add(side_volume(&self.bids))
    }

    /// Levels a market order on `side` consumes
    pub fn levels(&self, side: Side) -> &[OrderBookLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

fn side_volume(levels: &[OrderBookLevel]) -> Quantity {
    levels
        .iter()
        .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.quantity))
}
