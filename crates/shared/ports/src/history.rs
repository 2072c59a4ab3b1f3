use async_trait::async_trait;
use costsim_core::{
    HistoricalData, PerformanceRecord, SnapshotRecord, Timestamp, TradingMetrics,
};

use crate::error::StoreResult;

/// Port for persisting per-tick results
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn save_snapshot(&self, snapshot: &SnapshotRecord) -> StoreResult<()>;

    async fn save_trading_metrics(&self, metrics: &TradingMetrics) -> StoreResult<()>;

    async fn save_performance(&self, record: &PerformanceRecord) -> StoreResult<()>;

    /// All records with `start <= timestamp <= end`, ordered by timestamp
    async fn history(&self, start: Timestamp, end: Timestamp) -> StoreResult<HistoricalData>;
}
