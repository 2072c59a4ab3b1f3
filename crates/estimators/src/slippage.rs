//! Slippage Estimator
//!
//! Two views of the same cost:
//!
//! ```text
//! observe  walk the book for the actual fill:
//!          VWAP = Σ pᵢqᵢ / Σ qᵢ over the levels consumed
//!          slippage (bps) = side × (VWAP - mid) / mid × 10 000
//!
//! predict  linear quantile regression over observed fills:
//!          slippage ≈ a + b × quantity     (minimises the pinball loss)
//! ```
//!
//! The observation history is bounded and the regression is only refitted when
//! new fills arrived since the last fit.

use std::collections::VecDeque;

use costsim_core::{OrderBook, Side};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Iteratively reweighted least squares settings
const IRLS_MAX_ITER: usize = 50;
const IRLS_TOLERANCE: f64 = 1e-9;
/// Residual floor so weights stay finite on exact fits
const RESIDUAL_FLOOR: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlippageConfig {
    /// Quantile to predict, in (0, 1); 0.5 is the median
    pub quantile: f64,
    /// Number of fills kept for fitting
    pub history_window: usize,
}

impl Default for SlippageConfig {
    fn default() -> Self {
        Self {
            quantile: 0.5,
            history_window: 500,
        }
    }
}

/// Result of sweeping one side of the book
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    /// Quantity actually available, at most the requested quantity
    pub filled: f64,
    /// Volume-weighted average fill price
    pub vwap: f64,
    /// Number of levels touched
    pub levels: usize,
}

/// Sweep the levels a market order on `side` would consume
///
/// Returns `None` when nothing can be filled (empty side or non-positive
/// quantity). A partial fill is returned when the book runs out.
pub fn walk_book(book: &OrderBook, side: Side, quantity: f64) -> Option<Fill> {
    if quantity.is_nan() || quantity <= 0.0 {
        return None;
    }

    let mut remaining = quantity;
    let mut filled = 0.0;
    let mut notional = 0.0;
    let mut levels = 0;

    for level in book.levels(side) {
        if remaining <= 0.0 {
            break;
        }
        let (Some(price), Some(available)) = (level.price.to_f64(), level.quantity.to_f64())
        else {
            continue;
        };
        let take = remaining.min(available);
        if take <= 0.0 {
            continue;
        }
        filled += take;
        notional += take * price;
        remaining -= take;
        levels += 1;
    }

    (filled > 0.0).then(|| Fill {
        filled,
        vwap: notional / filled,
        levels,
    })
}

/// Intercept and slope of the fitted quantile line
#[derive(Debug, Clone, Copy, PartialEq)]
struct LinearFit {
    intercept: f64,
    slope: f64,
}

impl LinearFit {
    fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Walk-the-book slippage with a quantile-regression forecast
#[derive(Debug, Clone)]
pub struct SlippageEstimator {
    config: SlippageConfig,
    /// (filled quantity, slippage bps)
    history: VecDeque<(f64, f64)>,
    fit: Option<LinearFit>,
    stale: bool,
}

impl SlippageEstimator {
    pub fn new(config: SlippageConfig) -> Self {
        Self {
            config,
            history: VecDeque::with_capacity(config.history_window),
            fit: None,
            stale: false,
        }
    }

    pub fn config(&self) -> &SlippageConfig {
        &self.config
    }

    /// Number of fills currently kept
    pub fn observations(&self) -> usize {
        self.history.len()
    }

    /// Slippage in bps of a market order for `quantity` base units
    ///
    /// Positive means worse than mid for either side. The fill is recorded for
    /// [`predict`](Self::predict). `None` on an empty side, a zero mid or a
    /// non-positive quantity.
    pub fn observe(&mut self, book: &OrderBook, side: Side, quantity: f64) -> Option<f64> {
        let mid = book.mid_price().to_f64().filter(|m| *m > 0.0)?;
        let fill = walk_book(book, side, quantity)?;
        let slippage_bps = side.sign() * (fill.vwap - mid) / mid * 10_000.0;

        self.record(fill.filled, slippage_bps);
        Some(slippage_bps)
    }

    /// Add an externally measured fill
    pub fn record(&mut self, quantity: f64, slippage_bps: f64) {
        if !quantity.is_finite() || !slippage_bps.is_finite() {
            return;
        }
        if self.config.history_window == 0 {
            return;
        }
        while self.history.len() >= self.config.history_window {
            self.history.pop_front();
        }
        self.history.push_back((quantity, slippage_bps));
        self.stale = true;
    }

    /// Forecast slippage in bps for `quantity`, never negative
    ///
    /// Zero until at least two fills have been observed.
    pub fn predict(&mut self, quantity: f64) -> f64 {
        if self.history.len() < 2 {
            return 0.0;
        }
        if self.stale || self.fit.is_none() {
            self.fit = Some(fit_quantile(&self.history, self.config.quantile));
            self.stale = false;
            log::trace!(
                "slippage model refitted on {} fills: {:?}",
                self.history.len(),
                self.fit
            );
        }
        self.fit
            .map(|fit| fit.at(quantity))
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
            .max(0.0)
    }
}

impl Default for SlippageEstimator {
    fn default() -> Self {
        Self::new(SlippageConfig::default())
    }
}

/// Linear quantile regression by iteratively reweighted least squares
///
/// Each pass solves a weighted least-squares line with weights
/// `τ/|r|` above the line and `(1-τ)/|r|` below it, which converges to the
/// minimiser of the pinball loss.
fn fit_quantile(points: &VecDeque<(f64, f64)>, quantile: f64) -> LinearFit {
    let tau = quantile.clamp(0.01, 0.99);
    let mut weights = vec![1.0; points.len()];
    let Some(mut fit) = weighted_line(points, &weights) else {
        return flat_fit(points, tau);
    };

    for _ in 0..IRLS_MAX_ITER {
        for (w, &(x, y)) in weights.iter_mut().zip(points) {
            let residual = y - fit.at(x);
            let scale = if residual >= 0.0 { tau } else { 1.0 - tau };
            *w = scale / residual.abs().max(RESIDUAL_FLOOR);
        }
        let Some(next) = weighted_line(points, &weights) else {
            break;
        };
        let delta = (next.intercept - fit.intercept).abs() + (next.slope - fit.slope).abs();
        fit = next;
        if delta < IRLS_TOLERANCE {
            break;
        }
    }
    fit
}

/// Weighted least-squares line, `None` when every x is the same
fn weighted_line(points: &VecDeque<(f64, f64)>, weights: &[f64]) -> Option<LinearFit> {
    let (mut sw, mut sx, mut sy) = (0.0, 0.0, 0.0);
    for (&w, &(x, y)) in weights.iter().zip(points) {
        sw += w;
        sx += w * x;
        sy += w * y;
    }
    if sw <= 0.0 {
        return None;
    }
    let (mean_x, mean_y) = (sx / sw, sy / sw);

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (&w, &(x, y)) in weights.iter().zip(points) {
        sxx += w * (x - mean_x) * (x - mean_x);
        sxy += w * (x - mean_x) * (y - mean_y);
    }
    if sxx <= f64::EPSILON * sw * (1.0 + mean_x * mean_x) {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        intercept: mean_y - slope * mean_x,
        slope,
    })
}

/// Constant line at the empirical quantile of the slippages
fn flat_fit(points: &VecDeque<(f64, f64)>, tau: f64) -> LinearFit {
    let mut ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    ys.sort_by(f64::total_cmp);
    let index = ((ys.len() - 1) as f64 * tau).round() as usize;
    LinearFit {
        intercept: ys[index.min(ys.len() - 1)],
        slope: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Utc;
    use costsim_core::OrderBookLevel;
    use rust_decimal_macros::dec;

    fn book() -> OrderBook {
        OrderBook {
            timestamp: Utc::now(),
            exchange: "OKX".to_string(),
            symbol: "BTC-USDT-SWAP".to_string(),
            asks: vec![
                OrderBookLevel::new(dec!(101), dec!(1)),
                OrderBookLevel::new(dec!(102), dec!(1)),
            ],
            bids: vec![
                OrderBookLevel::new(dec!(99), dec!(1)),
                OrderBookLevel::new(dec!(98), dec!(1)),
            ],
        }
    }

    #[test]
    fn test_walk_book_partial_levels() {
        let fill = walk_book(&book(), Side::Buy, 1.5).unwrap();
        assert_eq!(fill.levels, 2);
        assert_relative_eq!(fill.filled, 1.5);
        // (101 × 1 + 102 × 0.5) / 1.5
        assert_relative_eq!(fill.vwap, 152.0 / 1.5);
    }

    #[test]
    fn test_walk_book_runs_out() {
        let fill = walk_book(&book(), Side::Sell, 10.0).unwrap();
        assert_relative_eq!(fill.filled, 2.0);
        assert_relative_eq!(fill.vwap, 98.5);
        assert!(walk_book(&book(), Side::Sell, 0.0).is_none());
    }

    #[test]
    fn test_observe_first_level_is_half_spread() {
        let mut estimator = SlippageEstimator::default();
        // Mid 100, ask 101: 1% = 100 bps
        let buy = estimator.observe(&book(), Side::Buy, 0.5).unwrap();
        assert_relative_eq!(buy, 100.0, max_relative = 1e-12);
        // Selling at 99 costs the same
        let sell = estimator.observe(&book(), Side::Sell, 0.5).unwrap();
        assert_relative_eq!(sell, 100.0, max_relative = 1e-12);
        assert_eq!(estimator.observations(), 2);
    }

    #[test]
    fn test_observe_empty_side() {
        let mut empty = book();
        empty.asks.clear();
        let mut estimator = SlippageEstimator::default();
        assert!(estimator.observe(&empty, Side::Buy, 1.0).is_none());
        assert_eq!(estimator.observations(), 0);
    }

    #[test]
    fn test_predict_needs_two_points() {
        let mut estimator = SlippageEstimator::default();
        assert_eq!(estimator.predict(1.0), 0.0);
        estimator.record(1.0, 5.0);
        assert_eq!(estimator.predict(1.0), 0.0);
    }

    #[test]
    fn test_predict_recovers_linear_relation() {
        let mut estimator = SlippageEstimator::default();
        for i in 1..=20 {
            let q = i as f64;
            estimator.record(q, 2.0 + 0.5 * q);
        }
        assert_relative_eq!(estimator.predict(30.0), 17.0, max_relative = 1e-6);
    }

    #[test]
    fn test_median_ignores_outlier() {
        let mut estimator = SlippageEstimator::default();
        for i in 1..=21 {
            let q = i as f64;
            estimator.record(q, q);
        }
        estimator.record(10.0, 10_000.0);
        // A least-squares line would be dragged far up
        assert!((estimator.predict(10.0) - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_predict_clamps_at_zero() {
        let mut estimator = SlippageEstimator::default();
        estimator.record(1.0, -5.0);
        estimator.record(2.0, -6.0);
        assert_eq!(estimator.predict(1.5), 0.0);
    }

    #[test]
    fn test_constant_quantity_uses_flat_quantile() {
        let mut estimator = SlippageEstimator::default();
        for y in [1.0, 2.0, 3.0, 4.0, 5.0] {
            estimator.record(1.0, y);
        }
        assert_eq!(estimator.predict(1.0), 3.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut estimator = SlippageEstimator::new(SlippageConfig {
            history_window: 3,
            ..Default::default()
        });
        for i in 0..10 {
            estimator.record(i as f64, 1.0);
        }
        assert_eq!(estimator.observations(), 3);
    }
}
