//! Replay feed
//!
//! Serves recorded frames in order, for tests and offline runs.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use costsim_core::OrderBook;
use costsim_ports::{FeedError, FeedResult, MarketDataSource};
use parking_lot::Mutex;

use crate::error::GatewayError;
use crate::processor::OrderBookProcessor;

struct ReplayState {
    pending: VecDeque<String>,
    processor: OrderBookProcessor,
}

/// Finite `MarketDataSource` over raw JSON frames
pub struct ReplayFeed {
    state: Mutex<ReplayState>,
    /// Pause before each book, to mimic a live feed's pace
    interval: Option<Duration>,
}

impl ReplayFeed {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Mutex::new(ReplayState {
                pending: messages.into_iter().map(Into::into).collect(),
                processor: OrderBookProcessor::new(),
            }),
            interval: None,
        }
    }

    /// Load newline-delimited frames; blank lines are skipped
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        ))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Frames not yet served
    pub fn remaining(&self) -> usize {
        self.state.lock().pending.len()
    }
}

#[async_trait]
impl MarketDataSource for ReplayFeed {
    async fn next_book(&self) -> FeedResult<OrderBook> {
        if let Some(interval) = self.interval {
            tokio::time::sleep(interval).await;
        }

        let mut state = self.state.lock();
        let raw = state.pending.pop_front().ok_or(FeedError::Exhausted)?;
        let book = state.processor.process_message(&raw)?;
        Ok(book.clone())
    }

    fn name(&self) -> &str {
        "ReplayFeed"
    }
}
