use costsim_core::{PerformanceReport, TradingMetrics};
use costsim_ports::DisplaySink;

/// One log line per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn format(metrics: &TradingMetrics, performance: &PerformanceReport) -> String {
        format!(
            "slippage {:.4} bps | fees {:.4} USD | impact {:.4} bps | net {:.4} USD | \
             maker/taker {:.0}/{:.0} | latency {:.3} ms (avg {:.3}) | {:.1} ticks/s",
            metrics.slippage_bps,
            metrics.fees,
            metrics.impact_bps,
            metrics.net_cost,
            metrics.maker_proportion * 100.0,
            (1.0 - metrics.maker_proportion) * 100.0,
            metrics.processing_time_ms,
            performance.statistics.avg_processing_time_ms,
            performance.ticks_per_second,
        )
    }
}

impl DisplaySink for ConsoleDisplay {
    fn publish(&self, metrics: &TradingMetrics, performance: &PerformanceReport) {
        log::info!(target: "costsim.display", "{}", Self::format(metrics, performance));
    }
}
