//! Expected fees for a blended maker/taker fill

use costsim_core::FeeTier;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Fee in quote currency for `notional`, `maker_proportion` of it filled as maker
///
/// Computed in `Decimal` with the tier's rates; non-finite inputs count as zero.
pub fn expected_fee(tier: FeeTier, notional: f64, maker_proportion: f64) -> f64 {
    let notional = Decimal::from_f64(notional).unwrap_or_default();
    let proportion = Decimal::from_f64(maker_proportion).unwrap_or_default();
    tier.schedule()
        .blended_fee(notional, proportion)
        .to_f64()
        .unwrap_or(0.0)
}
