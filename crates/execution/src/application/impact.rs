//! Almgren-Chriss Point Impact and Cost
//!
//! Separates impact into temporary (rate-driven) and permanent components:
//! ```text
//! Temporary Impact = η × (q/t) × (σ/√t)
//! Permanent Impact = γ × q
//! Total (bps)      = (Temporary + Permanent) / P₀ × 10 000
//! ```

use crate::domain::{ImpactBreakdown, MarketImpactParameters};
use crate::error::{DomainError, DomainResult};

const BPS: f64 = 10_000.0;

/// Impact of executing `quantity` over `time`, split into its components
///
/// # Errors
/// [`DomainError`] when `time` or the initial price is not positive, a
/// coefficient is negative, or an input is not finite.
pub fn impact_breakdown(
    params: &MarketImpactParameters,
    quantity: f64,
    time: f64,
) -> DomainResult<ImpactBreakdown> {
    params.validate_for_impact()?;
    if !quantity.is_finite() {
        return Err(DomainError::NonFinite { name: "quantity" });
    }
    if !time.is_finite() {
        return Err(DomainError::NonFinite { name: "time" });
    }
    if time <= 0.0 {
        return Err(DomainError::NonPositiveTime(time));
    }

    let temporary = params.eta * (quantity / time) * (params.sigma / time.sqrt());
    let permanent = params.gamma * quantity;

    Ok(ImpactBreakdown::from_bps(
        temporary / params.initial_price * BPS,
        permanent / params.initial_price * BPS,
    ))
}

/// Total market impact in basis points
///
/// Same value as [`impact_breakdown`]'s `total_bps`; the sign follows
/// `quantity`.
pub fn compute_market_impact(
    params: &MarketImpactParameters,
    quantity: f64,
    time: f64,
) -> DomainResult<f64> {
    impact_breakdown(params, quantity, time).map(|impact| impact.total_bps)
}

/// Execution cost in quote currency, market impact included
///
/// `quantity × P₀ × (1 + impact / 10 000)`. Negative for a sell: the proceeds
/// received, reduced by the impact.
pub fn estimate_execution_cost(
    params: &MarketImpactParameters,
    quantity: f64,
    time: f64,
) -> DomainResult<f64> {
    let impact = compute_market_impact(params, quantity, time)?;
    Ok(quantity * params.initial_price * (1.0 + impact / BPS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MarketImpactParameters {
        MarketImpactParameters::new(0.1, 0.1, 0.02, 1.0, 50_000.0, 1.0)
    }

    #[test]
    fn test_breakdown_components() {
        let impact = impact_breakdown(&params(), 1.0, 1.0).unwrap();
        // temporary: 0.1 × 1 × 0.02 = 0.002 → 0.0004 bps
        // permanent: 0.1 × 1 = 0.1 → 0.02 bps
        assert!((impact.temporary_bps - 0.0004).abs() < 1e-12);
        assert!((impact.permanent_bps - 0.02).abs() < 1e-12);
        assert!((impact.total_bps - 0.0204).abs() < 1e-12);
    }

    #[test]
    fn test_temporary_impact_falls_with_time() {
        let fast = impact_breakdown(&params(), 1.0, 0.25).unwrap();
        let slow = impact_breakdown(&params(), 1.0, 4.0).unwrap();
        // Scales with t^(-3/2): 0.25 → ×8, 4 → ×1/8
        assert!((fast.temporary_bps / slow.temporary_bps - 64.0).abs() < 1e-9);
        assert_eq!(fast.permanent_bps, slow.permanent_bps);
    }

    #[test]
    fn test_zero_time_rejected() {
        assert_eq!(
            compute_market_impact(&params(), 1.0, 0.0),
            Err(DomainError::NonPositiveTime(0.0))
        );
        assert!(compute_market_impact(&params(), 1.0, -1.0).is_err());
    }

    #[test]
    fn test_zero_price_rejected() {
        let p = MarketImpactParameters {
            initial_price: 0.0,
            ..params()
        };
        assert_eq!(
            estimate_execution_cost(&p, 1.0, 1.0),
            Err(DomainError::NonPositivePrice(0.0))
        );
    }

    #[test]
    fn test_non_finite_quantity_rejected() {
        assert_eq!(
            compute_market_impact(&params(), f64::NAN, 1.0),
            Err(DomainError::NonFinite { name: "quantity" })
        );
    }

    #[test]
    fn test_cost_includes_impact() {
        let cost = estimate_execution_cost(&params(), 1.0, 1.0).unwrap();
        let expected = 50_000.0 * (1.0 + 0.0204 / 10_000.0);
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sell_cost_is_negative() {
        let cost = estimate_execution_cost(&params(), -1.0, 1.0).unwrap();
        assert!(cost < 0.0);
        // Impact makes the sell worse: proceeds below the mark
        assert!(cost.abs() < 50_000.0);
    }
}
