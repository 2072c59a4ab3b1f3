mod fee;
mod order_book;
mod records;
mod side;

pub use fee::{FeeSchedule, FeeTier};
pub use order_book::{OrderBook, OrderBookLevel};
pub use records::{
    HistoricalData, PerformanceRecord, PerformanceReport, PerformanceStatistics, SnapshotRecord,
    TradingMetrics,
};
pub use side::Side;
