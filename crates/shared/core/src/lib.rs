//! Costsim Core Domain
//!
//! Pure domain types for the costsim trade-cost simulator.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    // Fee types
    FeeSchedule,
    FeeTier,
    // Market data
    OrderBook,
    OrderBookLevel,
    Side,
    // Persisted records
    HistoricalData,
    PerformanceRecord,
    PerformanceReport,
    PerformanceStatistics,
    SnapshotRecord,
    TradingMetrics,
};
pub use values::{Price, Quantity, Symbol, Timestamp};
