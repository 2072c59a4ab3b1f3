//! Costsim Runner - Trade-Cost Simulator
//!
//! Wires the feed, the cost models, persistence and display together:
//!
//! - **Config**: JSON configuration with defaults for every field
//! - **Performance**: rolling processing, publish and latency statistics
//! - **Pipeline**: per-book cost evaluation, persistence and publishing
//! - **Display**: console output of each tick
//!
//! ## Architecture
//!
//! ```text
//!              ┌────────────────────────┐
//!              │   MarketDataSource     │
//!              │ (WebSocket / replay)   │
//!              └───────────┬────────────┘
//!                          │ OrderBook
//!                          ▼
//! ┌────────────────────────────────────────────────────┐
//! │                  CostSimulator                     │
//! │                                                    │
//! │  ┌──────────┐ ┌─────────────┐ ┌──────┐ ┌────────┐  │
//! │  │ Slippage │ │ Maker/Taker │ │ Fees │ │ Impact │  │
//! │  └──────────┘ └─────────────┘ └──────┘ └────────┘  │
//! │                PerformanceAnalyzer                 │
//! └───────────┬──────────────────────────┬─────────────┘
//!             │ TradingMetrics           │
//!             ▼                          ▼
//!    ┌─────────────────┐        ┌─────────────────┐
//!    │  HistoryStore   │        │   DisplaySink   │
//!    │ (SQLite/memory) │        │   (console)     │
//!    └─────────────────┘        └─────────────────┘
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod performance;
pub mod pipeline;

// Re-export main types
pub use config::{ConfigError, DEFAULT_WS_URL, RunnerConfig, load_config, save_config};
pub use display::ConsoleDisplay;
pub use error::{RunnerError, RunnerResult};
pub use performance::PerformanceAnalyzer;
pub use pipeline::{CostSimulator, PipelineSettings, StopReason};
