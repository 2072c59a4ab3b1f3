use async_trait::async_trait;
use costsim_core::OrderBook;

use crate::error::FeedResult;

/// Port for order-book feeds
///
/// Implementations:
/// - WebSocket client for a live exchange feed
/// - Replay of recorded messages for tests and offline runs
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Wait for the next book
    ///
    /// A failure does not end the source: the caller decides whether to call
    /// again. [`FeedError::Exhausted`](crate::FeedError::Exhausted) means no
    /// more books will ever arrive.
    async fn next_book(&self) -> FeedResult<OrderBook>;

    /// Get the source's name for logging
    fn name(&self) -> &str {
        "MarketDataSource"
    }
}
