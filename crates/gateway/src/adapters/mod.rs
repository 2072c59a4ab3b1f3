//! Feed adapters
//!
//! Implementations of the `MarketDataSource` port.

mod replay;
mod websocket;

pub use replay::ReplayFeed;
pub use websocket::{WsFeedClient, WsFeedConfig};
