use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fee tier based on 30-day trading volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeeTier {
    /// Default tier for new users
    #[default]
    #[serde(alias = "Tier 1")]
    Tier1,
    #[serde(alias = "Tier 2")]
    Tier2,
    #[serde(alias = "Tier 3")]
    Tier3,
}

impl FeeTier {
    pub const ALL: [FeeTier; 3] = [FeeTier::Tier1, FeeTier::Tier2, FeeTier::Tier3];

    /// Maker/taker rates charged at this tier
    pub fn schedule(&self) -> FeeSchedule {
        match self {
            FeeTier::Tier1 => FeeSchedule::new(dec!(0.0008), dec!(0.001)),
            FeeTier::Tier2 => FeeSchedule::new(dec!(0.0006), dec!(0.0008)),
            FeeTier::Tier3 => FeeSchedule::new(dec!(0.0004), dec!(0.0006)),
        }
    }
}

/// Fee rates for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee for maker orders (adds liquidity) - typically lower
    pub maker_rate: Decimal,

    /// Fee for taker orders (removes liquidity) - typically higher
    pub taker_rate: Decimal,
}

impl FeeSchedule {
    /// Create a new fee schedule
    pub fn new(maker_rate: Decimal, taker_rate: Decimal) -> Self {
        Self {
            maker_rate,
            taker_rate,
        }
    }

    /// Calculate fee for a trade filled entirely as maker or as taker
    pub fn calculate_fee(&self, notional: Decimal, is_maker: bool) -> Decimal {
        let rate = if is_maker {
            self.maker_rate
        } else {
            self.taker_rate
        };
        notional * rate
    }

    /// Fee for an order expected to fill `maker_proportion` as maker
    ///
    /// The proportion is clamped to [0, 1].
    pub fn blended_fee(&self, notional: Decimal, maker_proportion: Decimal) -> Decimal {
        let p = maker_proportion.clamp(Decimal::ZERO, Decimal::ONE);
        notional * (p * self.maker_rate + (Decimal::ONE - p) * self.taker_rate)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        FeeTier::default().schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_schedule_default() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.maker_rate, dec!(0.0008));
        assert_eq!(schedule.taker_rate, dec!(0.001));
    }

    #[test]
    fn test_fee_calculation() {
        let schedule = FeeSchedule::new(dec!(0.001), dec!(0.002)); // 0.1% maker, 0.2% taker

        // Maker fee: 10000 * 0.001 = 10
        assert_eq!(schedule.calculate_fee(dec!(10000), true), dec!(10));

        // Taker fee: 10000 * 0.002 = 20
        assert_eq!(schedule.calculate_fee(dec!(10000), false), dec!(20));
    }

    #[test]
    fn test_blended_fee() {
        let schedule = FeeSchedule::new(dec!(0.001), dec!(0.002));

        // Half maker: 10000 * (0.5 * 0.001 + 0.5 * 0.002) = 15
        assert_eq!(schedule.blended_fee(dec!(10000), dec!(0.5)), dec!(15));
        assert_eq!(schedule.blended_fee(dec!(10000), dec!(1)), dec!(10));
        // Out of range proportions clamp
        assert_eq!(schedule.blended_fee(dec!(10000), dec!(-3)), dec!(20));
    }

    #[test]
    fn test_tiers_get_cheaper() {
        let rates: Vec<_> = FeeTier::ALL.iter().map(|t| t.schedule().taker_rate).collect();
        assert_eq!(rates, vec![dec!(0.001), dec!(0.0008), dec!(0.0006)]);
        for tier in FeeTier::ALL {
            let schedule = tier.schedule();
            assert!(schedule.maker_rate < schedule.taker_rate);
        }
    }
}
