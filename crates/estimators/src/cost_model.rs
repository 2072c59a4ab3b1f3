//! Combined Cost Model
//!
//! Expected all-in cost of one configured market order against the current
//! book:
//!
//! ```text
//! base qty  = quantity_usd / mid
//! slippage  = observed walk of the book (or forecast when the book is too thin)
//! fees      = notional × (p × maker + (1 - p) × taker)
//! impact    = Almgren-Chriss bps for ± base qty over the horizon
//! net cost  = fees + notional × (slippage + |impact|) / 10 000
//! ```

use costsim_core::{FeeTier, OrderBook, Side, Timestamp, TradingMetrics};
use costsim_execution::{ImpactBreakdown, MarketImpactParameters, impact_breakdown};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{CostError, CostResult};
use crate::fees::expected_fee;
use crate::maker_taker::{MakerTakerPredictor, MarketFeatures};
use crate::slippage::SlippageEstimator;

/// The order being costed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInputs {
    /// Order size in quote currency (USD)
    pub quantity_usd: f64,
    /// Volatility over the horizon
    pub volatility: f64,
    pub fee_tier: FeeTier,
    /// Temporary-impact coefficient
    pub eta: f64,
    /// Permanent-impact coefficient
    pub gamma: f64,
    /// Execution horizon
    pub horizon: f64,
    pub side: Side,
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            quantity_usd: 100.0,
            volatility: 0.02,
            fee_tier: FeeTier::Tier1,
            eta: 0.1,
            gamma: 0.1,
            horizon: 1.0,
            side: Side::Buy,
        }
    }
}

/// Cost breakdown for one book
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub mid_price: f64,
    /// Order size in base units at the mid
    pub base_quantity: f64,
    pub slippage_bps: f64,
    /// Whether the slippage came from walking the book or from the forecast
    pub slippage_observed: bool,
    pub maker_proportion: f64,
    pub fees: f64,
    pub impact: ImpactBreakdown,
    pub net_cost: f64,
}

impl CostEstimate {
    pub fn impact_bps(&self) -> f64 {
        self.impact.total_bps
    }

    pub fn to_metrics(&self, timestamp: Timestamp, processing_time_ms: f64) -> TradingMetrics {
        TradingMetrics {
            timestamp,
            slippage_bps: self.slippage_bps,
            fees: self.fees,
            impact_bps: self.impact.total_bps,
            net_cost: self.net_cost,
            maker_proportion: self.maker_proportion,
            processing_time_ms,
        }
    }
}

/// Slippage, maker/taker, fee and impact models for one order
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    inputs: CostInputs,
    slippage: SlippageEstimator,
    maker_taker: MakerTakerPredictor,
}

impl CostModel {
    pub fn new(
        inputs: CostInputs,
        slippage: SlippageEstimator,
        maker_taker: MakerTakerPredictor,
    ) -> Self {
        Self {
            inputs,
            slippage,
            maker_taker,
        }
    }

    pub fn with_inputs(inputs: CostInputs) -> Self {
        Self {
            inputs,
            ..Default::default()
        }
    }

    pub fn inputs(&self) -> &CostInputs {
        &self.inputs
    }

    /// Change the order being costed; fitted history is kept
    pub fn set_inputs(&mut self, inputs: CostInputs) {
        self.inputs = inputs;
    }

    pub fn slippage(&self) -> &SlippageEstimator {
        &self.slippage
    }

    pub fn maker_taker(&self) -> &MakerTakerPredictor {
        &self.maker_taker
    }

    pub fn evaluate(&mut self, book: &OrderBook) -> CostResult<CostEstimate> {
        self.evaluate_with_fill(book, None)
    }

    /// Evaluate, then train the maker/taker model on a realised split
    ///
    /// The prediction used for this estimate is made before the update.
    pub fn evaluate_with_fill(
        &mut self,
        book: &OrderBook,
        observed_maker_proportion: Option<f64>,
    ) -> CostResult<CostEstimate> {
        let inputs = self.inputs;
        let mid = book
            .mid_price()
            .to_f64()
            .filter(|m| *m > 0.0)
            .ok_or(CostError::NoMarket)?;
        let base_quantity = inputs.quantity_usd / mid;

        let (slippage_bps, slippage_observed) =
            match self.slippage.observe(book, inputs.side, base_quantity) {
                Some(observed) => (observed, true),
                None => (self.slippage.predict(base_quantity), false),
            };

        let features = MarketFeatures::from_book(book, inputs.volatility);
        let maker_proportion = self.maker_taker.predict(&features);
        if let Some(observed) = observed_maker_proportion {
            self.maker_taker.update(features, observed);
        }

        let fees = expected_fee(inputs.fee_tier, inputs.quantity_usd, maker_proportion);

        let signed_quantity = inputs.side.sign() * base_quantity;
        let params = MarketImpactParameters::new(
            inputs.eta,
            inputs.gamma,
            inputs.volatility,
            inputs.horizon,
            mid,
            signed_quantity,
        );
        let impact = impact_breakdown(&params, signed_quantity, inputs.horizon)?;

        let net_cost =
            fees + inputs.quantity_usd * (slippage_bps + impact.total_bps.abs()) / 10_000.0;

        Ok(CostEstimate {
            mid_price: mid,
            base_quantity,
            slippage_bps,
            slippage_observed,
            maker_proportion,
            fees,
            impact,
            net_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Utc;
    use costsim_core::OrderBookLevel;
    use costsim_execution::DomainError;
    use rust_decimal_macros::dec;

    fn book() -> OrderBook {
        OrderBook {
            timestamp: Utc::now(),
            exchange: "OKX".to_string(),
            symbol: "BTC-USDT-SWAP".to_string(),
            asks: vec![
                OrderBookLevel::new(dec!(50000.0), dec!(1.0)),
                OrderBookLevel::new(dec!(50001.0), dec!(2.0)),
            ],
            bids: vec![
                OrderBookLevel::new(dec!(49999.0), dec!(1.5)),
                OrderBookLevel::new(dec!(49998.0), dec!(2.5)),
            ],
        }
    }

    #[test]
    fn test_evaluate_default_order() {
        let mut model = CostModel::default();
        let estimate = model.evaluate(&book()).unwrap();

        assert_relative_eq!(estimate.mid_price, 49_999.5);
        assert_relative_eq!(estimate.base_quantity, 100.0 / 49_999.5);
        assert!(estimate.slippage_observed);
        // Fits in the best ask: half spread of 0.5 on 49 999.5
        assert_relative_eq!(estimate.slippage_bps, 0.5 / 49_999.5 * 1e4, max_relative = 1e-9);
        // No maker/taker history yet
        assert_eq!(estimate.maker_proportion, 0.5);
        // 100 × (0.5 × 0.0008 + 0.5 × 0.001)
        assert_relative_eq!(estimate.fees, 0.09, max_relative = 1e-12);
        assert!(estimate.impact_bps() > 0.0);

        let expected_net = estimate.fees
            + 100.0 * (estimate.slippage_bps + estimate.impact_bps()) / 10_000.0;
        assert_relative_eq!(estimate.net_cost, expected_net);
    }

    #[test]
    fn test_sell_impact_is_negative_but_costs() {
        let mut model = CostModel::with_inputs(CostInputs {
            side: Side::Sell,
            ..Default::default()
        });
        let estimate = model.evaluate(&book()).unwrap();
        assert!(estimate.impact_bps() < 0.0);
        assert!(estimate.slippage_bps > 0.0);
        assert!(estimate.net_cost > estimate.fees);
    }

    #[test]
    fn test_one_sided_book_is_no_market() {
        let mut one_sided = book();
        one_sided.bids.clear();
        let mut model = CostModel::default();
        assert_eq!(model.evaluate(&one_sided), Err(CostError::NoMarket));
    }

    #[test]
    fn test_bad_horizon_is_domain_error() {
        let mut model = CostModel::with_inputs(CostInputs {
            horizon: 0.0,
            ..Default::default()
        });
        assert_eq!(
            model.evaluate(&book()),
            Err(CostError::Domain(DomainError::NonPositiveTime(0.0)))
        );
    }

    #[test]
    fn test_observed_fill_trains_predictor() {
        let mut model = CostModel::default();
        for _ in 0..12 {
            model.evaluate_with_fill(&book(), Some(1.0)).unwrap();
        }
        assert_eq!(model.maker_taker().samples(), 12);
        let estimate = model.evaluate(&book()).unwrap();
        assert!(estimate.maker_proportion > 0.5);
        // More maker flow means cheaper fees than the 50/50 default
        assert!(estimate.fees < 0.09);
    }

    #[test]
    fn test_slippage_forecast_when_book_empty_on_side() {
        let mut model = CostModel::default();
        model.evaluate(&book()).unwrap();
        model.evaluate(&book()).unwrap();

        // Best ask still defines the mid but has nothing resting on it
        let mut thin = book();
        thin.asks = vec![OrderBookLevel::new(dec!(50000.0), dec!(0))];
        let estimate = model.evaluate(&thin).unwrap();
        assert!(!estimate.slippage_observed);
        assert!(estimate.slippage_bps >= 0.0);
    }

    #[test]
    fn test_book_without_representable_mid_is_no_market() {
        let max = rust_decimal::Decimal::MAX;
        let mut huge = book();
        huge.asks = vec![OrderBookLevel::new(max, max)];
        huge.bids = vec![OrderBookLevel::new(max, max)];

        let mut model = CostModel::default();
        assert_eq!(model.evaluate(&huge), Err(CostError::NoMarket));
    }

    #[test]
    fn test_set_inputs_keeps_fitted_history() {
        let mut model = CostModel::default();
        for _ in 0..12 {
            model.evaluate_with_fill(&book(), Some(1.0)).unwrap();
        }
        let buy = model.evaluate(&book()).unwrap();

        model.set_inputs(CostInputs {
            quantity_usd: 200.0,
            side: Side::Sell,
            ..Default::default()
        });
        assert_eq!(model.inputs().quantity_usd, 200.0);
        assert_eq!(model.maker_taker().samples(), 12);

        let sell = model.evaluate(&book()).unwrap();
        assert_relative_eq!(sell.base_quantity, 2.0 * buy.base_quantity);
        assert!(sell.impact_bps() < 0.0);
        assert!(sell.maker_proportion > 0.5);
    }
}
