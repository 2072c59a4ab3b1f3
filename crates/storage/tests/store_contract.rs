//! Both history stores must agree: inclusive ranges, timestamp order,
//! insertion order for equal timestamps.

use chrono::{DateTime, Duration, TimeZone, Utc};
use costsim_core::{PerformanceRecord, SnapshotRecord, TradingMetrics};
use costsim_ports::HistoryStore;
use costsim_storage::{MemoryStore, SqliteStore};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap()
}

fn at(offset_ms: i64) -> DateTime<Utc> {
    base() + Duration::milliseconds(offset_ms)
}

fn snapshot(offset_ms: i64, mid: f64) -> SnapshotRecord {
    SnapshotRecord {
        timestamp: at(offset_ms),
        exchange: "OKX".to_string(),
        symbol: "BTC-USDT-SWAP".to_string(),
        mid_price: mid,
        spread: 1.0,
        depth: 7.0,
        volume: 7.0,
        data: r#"{"asks":[],"bids":[]}"#.to_string(),
    }
}

fn metrics(offset_ms: i64, net_cost: f64) -> TradingMetrics {
    TradingMetrics {
        timestamp: at(offset_ms),
        slippage_bps: 0.5,
        fees: 0.1,
        impact_bps: 0.02,
        net_cost,
        maker_proportion: 0.5,
        processing_time_ms: 0.25,
    }
}

fn performance(offset_ms: i64, ticks_per_second: f64) -> PerformanceRecord {
    PerformanceRecord {
        timestamp: at(offset_ms),
        avg_processing_time_ms: 0.3,
        avg_publish_time_ms: 0.1,
        avg_ws_latency_ms: 12.0,
        error_rate: 0.0,
        ticks_per_second,
    }
}

async fn check_ranges(store: &dyn HistoryStore) {
    // Written out of order, with a tie at +2000
    for (offset, value) in [(3000, 3.0), (1000, 1.0), (2000, 2.0), (2000, 2.5), (5000, 5.0)] {
        store.save_snapshot(&snapshot(offset, value)).await.unwrap();
        store.save_trading_metrics(&metrics(offset, value)).await.unwrap();
        store.save_performance(&performance(offset, value)).await.unwrap();
    }

    let data = store.history(at(1000), at(3000)).await.unwrap();

    let mids: Vec<f64> = data.snapshots.iter().map(|s| s.mid_price).collect();
    assert_eq!(mids, vec![1.0, 2.0, 2.5, 3.0]);
    let costs: Vec<f64> = data.trading.iter().map(|m| m.net_cost).collect();
    assert_eq!(costs, vec![1.0, 2.0, 2.5, 3.0]);
    let rates: Vec<f64> = data.performance.iter().map(|p| p.ticks_per_second).collect();
    assert_eq!(rates, vec![1.0, 2.0, 2.5, 3.0]);

    assert_eq!(data.snapshots[0], snapshot(1000, 1.0));
    assert_eq!(data.trading[3], metrics(3000, 3.0));
    assert_eq!(data.performance[1], performance(2000, 2.0));

    let empty = store.history(at(3500), at(4500)).await.unwrap();
    assert!(empty.is_empty());

    let inverted = store.history(at(5000), at(0)).await.unwrap();
    assert!(inverted.is_empty());

    let single = store.history(at(5000), at(5000)).await.unwrap();
    assert_eq!(single.trading.len(), 1);

    // Bounds between whole milliseconds
    let half = Duration::microseconds(500);
    let narrowed = store.history(at(1000) + half, at(3000) - half).await.unwrap();
    let mids: Vec<f64> = narrowed.snapshots.iter().map(|s| s.mid_price).collect();
    assert_eq!(mids, vec![2.0, 2.5]);
    assert_eq!(narrowed.performance.len(), 2);
    let widened = store.history(at(1000) - half, at(3000) + half).await.unwrap();
    assert_eq!(widened.trading.len(), 4);
}

async fn check_sub_millisecond_records(store: &dyn HistoryStore) {
    let mut record = metrics(7000, 7.0);
    record.timestamp += Duration::microseconds(300);
    store.save_trading_metrics(&record).await.unwrap();

    // Kept at millisecond resolution
    let data = store.history(at(7000), at(7000)).await.unwrap();
    assert_eq!(data.trading, vec![metrics(7000, 7.0)]);

    let after = at(7000) + Duration::microseconds(100);
    assert!(store.history(after, at(7001)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_store_ranges() {
    init_logging();
    let store = MemoryStore::new();
    assert!(store.is_empty());
    check_ranges(&store).await;
    assert_eq!(store.len(), (5, 5, 5));
    check_sub_millisecond_records(&store).await;
    assert_eq!(store.len(), (5, 6, 5));
}

#[tokio::test]
async fn test_sqlite_in_memory_ranges() {
    init_logging();
    let store = SqliteStore::in_memory().await.unwrap();
    check_ranges(&store).await;
    check_sub_millisecond_records(&store).await;
    store.close().await;
}

#[tokio::test]
async fn test_sqlite_file_persists_across_reopen() {
    init_logging();
    let dir = std::env::temp_dir().join(format!("costsim-store-{}", std::process::id()));
    let path = dir.join("nested").join("trading.db");
    let _ = std::fs::remove_dir_all(&dir);

    {
        let store = SqliteStore::open(&path).await.unwrap();
        store.save_trading_metrics(&metrics(0, 42.0)).await.unwrap();
        store.close().await;
    }
    assert!(path.exists());

    let store = SqliteStore::open(&path).await.unwrap();
    let data = store.history(at(-1000), at(1000)).await.unwrap();
    assert_eq!(data.trading, vec![metrics(0, 42.0)]);
    assert!(data.snapshots.is_empty());
    store.close().await;

    let _ = std::fs::remove_dir_all(&dir);
}
