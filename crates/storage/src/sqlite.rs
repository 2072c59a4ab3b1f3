//! SQLite history store
//!
//! Uses runtime query checking (no compile-time DATABASE_URL needed).
//! Timestamps are stored as INTEGER milliseconds since the Unix epoch.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use costsim_core::{
    HistoricalData, PerformanceRecord, SnapshotRecord, Timestamp, TradingMetrics,
};
use costsim_ports::{HistoryStore, StoreError, StoreResult};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};

const SCHEMA: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS orderbook_snapshots (
        timestamp INTEGER NOT NULL,
        exchange TEXT NOT NULL,
        symbol TEXT NOT NULL,
        mid_price REAL NOT NULL,
        spread REAL NOT NULL,
        depth REAL NOT NULL,
        volume REAL NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trading_metrics (
        timestamp INTEGER NOT NULL,
        slippage_bps REAL NOT NULL,
        fees REAL NOT NULL,
        impact_bps REAL NOT NULL,
        net_cost REAL NOT NULL,
        maker_proportion REAL NOT NULL,
        processing_time_ms REAL NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS performance_metrics (
        timestamp INTEGER NOT NULL,
        avg_processing_time_ms REAL NOT NULL,
        avg_publish_time_ms REAL NOT NULL,
        avg_ws_latency_ms REAL NOT NULL,
        error_rate REAL NOT NULL,
        ticks_per_second REAL NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_snapshots_ts ON orderbook_snapshots (timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_trading_ts ON trading_metrics (timestamp)",
    "CREATE INDEX IF NOT EXISTS idx_performance_ts ON performance_metrics (timestamp)",
];

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// `[start, end]` as the whole milliseconds it contains
fn range_millis(start: Timestamp, end: Timestamp) -> (i64, i64) {
    // timestamp_millis floors, so a sub-millisecond start rounds up
    let start_ms = if start.timestamp_subsec_nanos() % 1_000_000 == 0 {
        start.timestamp_millis()
    } else {
        start.timestamp_millis().saturating_add(1)
    };
    (start_ms, end.timestamp_millis())
}

fn millis_to_timestamp(ms: i64) -> StoreResult<Timestamp> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Serialization(format!("timestamp out of range: {ms}")))
}

/// History store backed by a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file, creating its parent directory
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(backend)?;

        log::info!("history store opened at {}", path.display());
        Self::with_pool(pool).await
    }

    /// Private in-memory database, gone when the store is dropped
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(backend)?;
        // Every connection to :memory: is its own database: keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(backend)?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(backend)?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn snapshots(&self, start: i64, end: i64) -> StoreResult<Vec<SnapshotRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, exchange, symbol, mid_price, spread, depth, volume, data
            FROM orderbook_snapshots
            WHERE timestamp BETWEEN ?1 AND ?2
            ORDER BY timestamp, rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(snapshot_from_row).collect()
    }

    async fn trading(&self, start: i64, end: i64) -> StoreResult<Vec<TradingMetrics>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, slippage_bps, fees, impact_bps, net_cost,
                   maker_proportion, processing_time_ms
            FROM trading_metrics
            WHERE timestamp BETWEEN ?1 AND ?2
            ORDER BY timestamp, rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(trading_from_row).collect()
    }

    async fn performance(&self, start: i64, end: i64) -> StoreResult<Vec<PerformanceRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, avg_processing_time_ms, avg_publish_time_ms,
                   avg_ws_latency_ms, error_rate, ticks_per_second
            FROM performance_metrics
            WHERE timestamp BETWEEN ?1 AND ?2
            ORDER BY timestamp, rowid
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(performance_from_row).collect()
    }
}

fn snapshot_from_row(row: &SqliteRow) -> StoreResult<SnapshotRecord> {
    Ok(SnapshotRecord {
        timestamp: millis_to_timestamp(row.try_get("timestamp").map_err(backend)?)?,
        exchange: row.try_get("exchange").map_err(backend)?,
        symbol: row.try_get("symbol").map_err(backend)?,
        mid_price: row.try_get("mid_price").map_err(backend)?,
        spread: row.try_get("spread").map_err(backend)?,
        depth: row.try_get("depth").map_err(backend)?,
        volume: row.try_get("volume").map_err(backend)?,
        data: row.try_get("data").map_err(backend)?,
    })
}

fn trading_from_row(row: &SqliteRow) -> StoreResult<TradingMetrics> {
    Ok(TradingMetrics {
        timestamp: millis_to_timestamp(row.try_get("timestamp").map_err(backend)?)?,
        slippage_bps: row.try_get("slippage_bps").map_err(backend)?,
        fees: row.try_get("fees").map_err(backend)?,
        impact_bps: row.try_get("impact_bps").map_err(backend)?,
        net_cost: row.try_get("net_cost").map_err(backend)?,
        maker_proportion: row.try_get("maker_proportion").map_err(backend)?,
        processing_time_ms: row.try_get("processing_time_ms").map_err(backend)?,
    })
}

fn performance_from_row(row: &SqliteRow) -> StoreResult<PerformanceRecord> {
    Ok(PerformanceRecord {
        timestamp: millis_to_timestamp(row.try_get("timestamp").map_err(backend)?)?,
        avg_processing_time_ms: row.try_get("avg_processing_time_ms").map_err(backend)?,
        avg_publish_time_ms: row.try_get("avg_publish_time_ms").map_err(backend)?,
        avg_ws_latency_ms: row.try_get("avg_ws_latency_ms").map_err(backend)?,
        error_rate: row.try_get("error_rate").map_err(backend)?,
        ticks_per_second: row.try_get("ticks_per_second").map_err(backend)?,
    })
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn save_snapshot(&self, snapshot: &SnapshotRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orderbook_snapshots
                (timestamp, exchange, symbol, mid_price, spread, depth, volume, data)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(snapshot.timestamp.timestamp_millis())
        .bind(&snapshot.exchange)
        .bind(&snapshot.symbol)
        .bind(snapshot.mid_price)
        .bind(snapshot.spread)
        .bind(snapshot.depth)
        .bind(snapshot.volume)
        .bind(&snapshot.data)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn save_trading_metrics(&self, metrics: &TradingMetrics) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO trading_metrics
                (timestamp, slippage_bps, fees, impact_bps, net_cost,
                 maker_proportion, processing_time_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(metrics.timestamp.timestamp_millis())
        .bind(metrics.slippage_bps)
        .bind(metrics.fees)
        .bind(metrics.impact_bps)
        .bind(metrics.net_cost)
        .bind(metrics.maker_proportion)
        .bind(metrics.processing_time_ms)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn save_performance(&self, record: &PerformanceRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO performance_metrics
                (timestamp, avg_processing_time_ms, avg_publish_time_ms,
                 avg_ws_latency_ms, error_rate, ticks_per_second)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(record.timestamp.timestamp_millis())
        .bind(record.avg_processing_time_ms)
        .bind(record.avg_publish_time_ms)
        .bind(record.avg_ws_latency_ms)
        .bind(record.error_rate)
        .bind(record.ticks_per_second)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn history(&self, start: Timestamp, end: Timestamp) -> StoreResult<HistoricalData> {
        let (start, end) = range_millis(start, end);
        Ok(HistoricalData {
            snapshots: self.snapshots(start, end).await?,
            trading: self.trading(start, end).await?,
            performance: self.performance(start, end).await?,
        })
    }
}
