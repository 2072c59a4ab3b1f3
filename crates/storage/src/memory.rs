use async_trait::async_trait;
use chrono::SubsecRound;
use costsim_core::{
    HistoricalData, PerformanceRecord, SnapshotRecord, Timestamp, TradingMetrics,
};
use costsim_ports::{HistoryStore, StoreResult};
use parking_lot::RwLock;

/// Keeps every record in memory
///
/// Timestamps are truncated to milliseconds on save, the resolution the
/// SQLite store keeps.
#[derive(Default)]
pub struct MemoryStore {
    snapshots: RwLock<Vec<SnapshotRecord>>,
    trading: RwLock<Vec<TradingMetrics>>,
    performance: RwLock<Vec<PerformanceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record counts as (snapshots, trading, performance)
    pub fn len(&self) -> (usize, usize, usize) {
        (
            self.snapshots.read().len(),
            self.trading.read().len(),
            self.performance.read().len(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.len() == (0, 0, 0)
    }
}

/// Records within `[start, end]`, stable-sorted by timestamp
fn in_range<T: Clone>(
    records: &[T],
    start: Timestamp,
    end: Timestamp,
    timestamp: impl Fn(&T) -> Timestamp,
) -> Vec<T> {
    let mut selected: Vec<T> = records
        .iter()
        .filter(|r| (start..=end).contains(&timestamp(r)))
        .cloned()
        .collect();
    selected.sort_by_key(|r| timestamp(r));
    selected
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn save_snapshot(&self, snapshot: &SnapshotRecord) -> StoreResult<()> {
        let mut snapshot = snapshot.clone();
        snapshot.timestamp = snapshot.timestamp.trunc_subsecs(3);
        self.snapshots.write().push(snapshot);
        Ok(())
    }

    async fn save_trading_metrics(&self, metrics: &TradingMetrics) -> StoreResult<()> {
        let mut metrics = metrics.clone();
        metrics.timestamp = metrics.timestamp.trunc_subsecs(3);
        self.trading.write().push(metrics);
        Ok(())
    }

    async fn save_performance(&self, record: &PerformanceRecord) -> StoreResult<()> {
        let mut record = record.clone();
        record.timestamp = record.timestamp.trunc_subsecs(3);
        self.performance.write().push(record);
        Ok(())
    }

    async fn history(&self, start: Timestamp, end: Timestamp) -> StoreResult<HistoricalData> {
        Ok(HistoricalData {
            snapshots: in_range(&self.snapshots.read(), start, end, |r| r.timestamp),
            trading: in_range(&self.trading.read(), start, end, |r| r.timestamp),
            performance: in_range(&self.performance.read(), start, end, |r| r.timestamp),
        })
    }
}
