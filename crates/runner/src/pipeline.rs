//! Cost Simulator Pipeline
//!
//! Pulls books from a feed and, for each one:
//!
//! ```text
//! OrderBook ──► CostModel::evaluate ──► TradingMetrics ──┬──► HistoryStore
//!                    │ timed                             └──► DisplaySink
//!                    ▼
//!            PerformanceAnalyzer ──(every N ticks)──► HistoryStore
//! ```

use std::sync::Arc;

use costsim_core::{HistoricalData, OrderBook, SnapshotRecord, Timestamp, TradingMetrics};
use costsim_estimators::CostModel;
use costsim_gateway::OrderBookMessage;
use costsim_ports::{
    Clock, DisplaySink, FeedError, HistoryStore, MarketDataSource, StoreError, Telemetry,
};
use tokio::sync::watch;

use crate::error::RunnerResult;
use crate::performance::PerformanceAnalyzer;

const COMPONENT: &str = "pipeline";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Ticks slower than this are reported through telemetry
    pub max_processing_time_ms: f64,
    /// Write a performance record every this many ticks
    pub performance_every: u64,
    /// Stop after this many books
    pub tick_limit: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_processing_time_ms: 100.0,
            performance_every: 100,
            tick_limit: None,
        }
    }
}

/// Why `run` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    Exhausted,
    TickLimit,
}

pub struct CostSimulator {
    model: CostModel,
    performance: PerformanceAnalyzer,
    settings: PipelineSettings,
    store: Arc<dyn HistoryStore>,
    display: Arc<dyn DisplaySink>,
    telemetry: Arc<dyn Telemetry>,
    clock: Arc<dyn Clock>,
}

impl CostSimulator {
    pub fn new(
        model: CostModel,
        performance: PerformanceAnalyzer,
        settings: PipelineSettings,
        store: Arc<dyn HistoryStore>,
        display: Arc<dyn DisplaySink>,
        telemetry: Arc<dyn Telemetry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            model,
            performance,
            settings,
            store,
            display,
            telemetry,
            clock,
        }
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut CostModel {
        &mut self.model
    }

    pub fn performance(&self) -> &PerformanceAnalyzer {
        &self.performance
    }

    /// Cost one book, persist it and publish the result
    pub async fn handle_book(&mut self, book: &OrderBook) -> RunnerResult<TradingMetrics> {
        let latency = self.clock.now() - book.timestamp;
        if let Some(micros) = latency.num_microseconds().filter(|m| *m >= 0) {
            self.performance.record_ws_latency(micros as f64 / 1_000.0);
        }

        let start = self.performance.start();
        let estimate = self.model.evaluate(book);
        let elapsed = self.performance.end_processing(start);

        let estimate = match estimate {
            Ok(estimate) => estimate,
            Err(e) => {
                self.performance.record_error();
                self.telemetry
                    .warn(COMPONENT, &format!("cannot cost {} book: {e}", book.symbol));
                return Err(e.into());
            }
        };

        if elapsed > self.settings.max_processing_time_ms {
            self.telemetry.warn(
                COMPONENT,
                &format!(
                    "processing took {elapsed:.3} ms (limit {:.3} ms)",
                    self.settings.max_processing_time_ms
                ),
            );
        }

        let metrics = estimate.to_metrics(self.clock.now(), elapsed);
        if let Err(e) = self.persist(book, &metrics).await {
            self.performance.record_error();
            self.telemetry
                .error(COMPONENT, &format!("failed to store tick: {e}"));
            return Err(e.into());
        }

        let start = self.performance.start();
        self.display.publish(&metrics, &self.performance.report());
        self.performance.end_publish(start);

        Ok(metrics)
    }

    async fn persist(&self, book: &OrderBook, metrics: &TradingMetrics) -> Result<(), StoreError> {
        let data = serde_json::to_string(&OrderBookMessage::from(book))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store
            .save_snapshot(&SnapshotRecord::from_book(book, data))
            .await?;
        self.store.save_trading_metrics(metrics).await
    }

    /// Write the current performance statistics to the store
    pub async fn write_performance(&self) -> RunnerResult<()> {
        let record = self.performance.report().to_record(self.clock.now());
        self.store.save_performance(&record).await?;
        Ok(())
    }

    /// Process books until shutdown, the end of a finite feed, or the tick limit
    ///
    /// Per-tick failures are counted and the loop keeps going; only the final
    /// performance write can fail the run.
    pub async fn run(
        &mut self,
        source: &dyn MarketDataSource,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunnerResult<StopReason> {
        self.telemetry
            .info(COMPONENT, &format!("reading books from {}", source.name()));
        let mut handled: u64 = 0;

        let reason = loop {
            if *shutdown.borrow() {
                break StopReason::Shutdown;
            }
            if self.settings.tick_limit.is_some_and(|limit| handled >= limit) {
                break StopReason::TickLimit;
            }

            let next = tokio::select! {
                biased;
                Ok(()) = shutdown.changed() => continue,
                next = source.next_book() => next,
            };

            match next {
                Ok(book) => {
                    handled += 1;
                    // Failures are already counted and reported by handle_book
                    let _ = self.handle_book(&book).await;

                    if handled % self.settings.performance_every.max(1) == 0 {
                        if let Err(e) = self.write_performance().await {
                            self.telemetry
                                .error(COMPONENT, &format!("failed to store performance: {e}"));
                        }
                    }
                }
                Err(FeedError::Exhausted) => break StopReason::Exhausted,
                Err(e) => {
                    self.performance.record_feed_error();
                    self.telemetry.warn(COMPONENT, &format!("feed error: {e}"));
                }
            }
        };

        self.write_performance().await?;
        let report = self.performance.report();
        self.telemetry.info(
            COMPONENT,
            &format!(
                "stopped ({reason:?}) after {} ticks, {} errors, {} feed errors",
                report.total_ticks, report.total_errors, report.feed_errors
            ),
        );
        Ok(reason)
    }

    /// Stored history within `[start, end]`
    pub async fn history(&self, start: Timestamp, end: Timestamp) -> RunnerResult<HistoricalData> {
        Ok(self.store.history(start, end).await?)
    }
}
