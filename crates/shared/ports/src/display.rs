use costsim_core::{PerformanceReport, TradingMetrics};

/// Port for whatever shows the results to a user
pub trait DisplaySink: Send + Sync {
    fn publish(&self, metrics: &TradingMetrics, performance: &PerformanceReport);
}
