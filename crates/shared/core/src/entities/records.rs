//! Persisted records
//!
//! Flat, `f64`-valued rows written to the history store on every tick and
//! read back for charts.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::OrderBook;
use crate::values::{Symbol, Timestamp};

/// Summary of one order-book snapshot plus its raw payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub timestamp: Timestamp,
    pub exchange: String,
    pub symbol: Symbol,
    pub mid_price: f64,
    pub spread: f64,
    pub depth: f64,
    pub volume: f64,
    /// Raw JSON of the book
    pub data: String,
}

impl SnapshotRecord {
    pub fn from_book(book: &OrderBook, data: String) -> Self {
        Self {
            timestamp: book.timestamp,
            exchange: book.exchange.clone(),
            symbol: book.symbol.clone(),
            mid_price: book.mid_price().to_f64().unwrap_or(0.0),
            spread: book.spread().to_f64().unwrap_or(0.0),
            depth: book.depth().to_f64().unwrap_or(0.0),
            volume: book.total_volume().to_f64().unwrap_or(0.0),
            data,
        }
    }
}

/// Cost estimate produced for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingMetrics {
    pub timestamp: Timestamp,
    /// Expected slippage against mid, in bps
    pub slippage_bps: f64,
    /// Expected fees in quote currency
    pub fees: f64,
    /// Almgren-Chriss market impact, in bps
    pub impact_bps: f64,
    /// Fees + slippage + impact, in quote currency
    pub net_cost: f64,
    /// Expected maker share of the fill, in [0, 1]
    pub maker_proportion: f64,
    /// Time spent computing this estimate
    pub processing_time_ms: f64,
}

/// Rolling performance statistics at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub timestamp: Timestamp,
    pub avg_processing_time_ms: f64,
    pub avg_publish_time_ms: f64,
    pub avg_ws_latency_ms: f64,
    pub error_rate: f64,
    pub ticks_per_second: f64,
}

/// Averages over the rolling performance windows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStatistics {
    pub avg_processing_time_ms: f64,
    pub max_processing_time_ms: f64,
    pub avg_publish_time_ms: f64,
    pub avg_ws_latency_ms: f64,
    /// Failed ticks / ticks, 0 before the first tick
    pub error_rate: f64,
}

/// Statistics plus run totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub statistics: PerformanceStatistics,
    pub uptime_seconds: f64,
    pub ticks_per_second: f64,
    pub total_ticks: u64,
    /// Books that were received but could not be costed or stored
    pub total_errors: u64,
    /// Frames the feed could not turn into a book; not counted as ticks
    #[serde(default)]
    pub feed_errors: u64,
}

impl PerformanceReport {
    pub fn to_record(&self, timestamp: Timestamp) -> PerformanceRecord {
        PerformanceRecord {
            timestamp,
            avg_processing_time_ms: self.statistics.avg_processing_time_ms,
            avg_publish_time_ms: self.statistics.avg_publish_time_ms,
            avg_ws_latency_ms: self.statistics.avg_ws_latency_ms,
            error_rate: self.statistics.error_rate,
            ticks_per_second: self.ticks_per_second,
        }
    }
}

/// Result of a history range query, each list ordered by timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    pub snapshots: Vec<SnapshotRecord>,
    pub trading: Vec<TradingMetrics>,
    pub performance: Vec<PerformanceRecord>,
}

impl HistoricalData {
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.trading.is_empty() && self.performance.is_empty()
    }
}
