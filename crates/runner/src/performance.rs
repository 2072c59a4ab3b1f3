//! Performance Analyzer
//!
//! Rolling windows of per-tick timings plus run totals.
//!
//! ```text
//! processing ──► [.. last N ..] ─┐
//! publish    ──► [.. last N ..] ─┼─► statistics() ─► report()
//! ws latency ──► [.. last N ..] ─┘         + uptime, ticks/s, totals
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use costsim_core::{PerformanceReport, PerformanceStatistics};

#[derive(Debug, Clone)]
struct Window {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl Window {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    fn max(&self) -> f64 {
        self.samples.iter().copied().fold(0.0, f64::max)
    }
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1_000.0
}

#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    processing: Window,
    publish: Window,
    ws_latency: Window,
    total_ticks: u64,
    total_errors: u64,
    feed_errors: u64,
    started: Instant,
}

impl PerformanceAnalyzer {
    pub fn new(window_size: usize) -> Self {
        Self {
            processing: Window::new(window_size),
            publish: Window::new(window_size),
            ws_latency: Window::new(window_size),
            total_ticks: 0,
            total_errors: 0,
            feed_errors: 0,
            started: Instant::now(),
        }
    }

    pub fn start(&self) -> Instant {
        Instant::now()
    }

    /// Record the processing time since `start` and count a tick
    pub fn end_processing(&mut self, start: Instant) -> f64 {
        let elapsed = millis(start.elapsed());
        self.record_processing(elapsed);
        elapsed
    }

    pub fn record_processing(&mut self, elapsed_ms: f64) {
        self.processing.push(elapsed_ms);
        self.total_ticks += 1;
    }

    pub fn end_publish(&mut self, start: Instant) -> f64 {
        let elapsed = millis(start.elapsed());
        self.publish.push(elapsed);
        elapsed
    }

    pub fn record_ws_latency(&mut self, latency_ms: f64) {
        self.ws_latency.push(latency_ms);
    }

    /// Count a failure on a tick already recorded by `end_processing`
    pub fn record_error(&mut self) {
        self.total_errors += 1;
    }

    /// Count a frame that never became a tick
    pub fn record_feed_error(&mut self) {
        self.feed_errors += 1;
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    pub fn feed_errors(&self) -> u64 {
        self.feed_errors
    }

    pub fn statistics(&self) -> PerformanceStatistics {
        let error_rate = if self.total_ticks > 0 {
            (self.total_errors as f64 / self.total_ticks as f64).min(1.0)
        } else {
            0.0
        };

        PerformanceStatistics {
            avg_processing_time_ms: self.processing.mean(),
            max_processing_time_ms: self.processing.max(),
            avg_publish_time_ms: self.publish.mean(),
            avg_ws_latency_ms: self.ws_latency.mean(),
            error_rate,
        }
    }

    pub fn report(&self) -> PerformanceReport {
        let uptime_seconds = self.started.elapsed().as_secs_f64();
        let ticks_per_second = if uptime_seconds > 0.0 {
            self.total_ticks as f64 / uptime_seconds
        } else {
            0.0
        };

        PerformanceReport {
            statistics: self.statistics(),
            uptime_seconds,
            ticks_per_second,
            total_ticks: self.total_ticks,
            total_errors: self.total_errors,
            feed_errors: self.feed_errors,
        }
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(100)
    }
}
