//! Costsim Ports
//!
//! Port definitions (traits) for the costsim trade-cost simulator.
//! These define the boundaries between the cost models and infrastructure:
//!
//! ```text
//!  MarketDataSource ──► pipeline ──► HistoryStore
//!                          │
//!              Clock ──────┼──────► DisplaySink
//!                          │
//!                      Telemetry
//! ```

mod clock;
mod display;
mod error;
mod history;
mod market_data;
mod telemetry;

pub use clock::Clock;
pub use display::DisplaySink;
pub use error::{FeedError, FeedResult, StoreError, StoreResult};
pub use history::HistoryStore;
pub use market_data::MarketDataSource;
pub use telemetry::{LogTelemetry, NoopTelemetry, Telemetry};
