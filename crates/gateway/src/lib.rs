//! Costsim Gateway
//!
//! Gateway layer for the costsim trade-cost simulator. Provides:
//! - Wire message type for level-2 order-book snapshots
//! - `OrderBookProcessor` turning raw frames into domain `OrderBook`s
//! - Feed adapters implementing the `MarketDataSource` port (WebSocket, replay)
//!
//! ## Architecture
//!
//! ```text
//! Exchange (WebSocket)        Recorded messages
//!         │                          │
//!   ┌─────▼──────┐            ┌──────▼─────┐
//!   │ WsFeedClient│            │ ReplayFeed │
//!   └─────┬──────┘            └──────┬─────┘
//!         │      OrderBookProcessor  │
//!         └────────────┬─────────────┘
//!                      │ OrderBook
//!               ┌──────▼──────┐
//!               │  pipeline   │
//!               └─────────────┘
//! ```

pub mod adapters;
pub mod error;
pub mod messages;
pub mod processor;

// Re-export commonly used types
pub use adapters::{ReplayFeed, WsFeedClient, WsFeedConfig};
pub use error::GatewayError;
pub use messages::market_data::{OrderBookMessage, WireLevel};
pub use processor::OrderBookProcessor;
