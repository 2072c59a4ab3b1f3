//! Impact Types
//!
//! Point estimate of market impact split into its two model components.

use serde::{Deserialize, Serialize};

/// Market impact in basis points (1 bp = 0.01%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactBreakdown {
    /// Rate-dependent part, reverts after execution
    pub temporary_bps: f64,
    /// Size-dependent part, persists
    pub permanent_bps: f64,
    /// Sum of both components
    pub total_bps: f64,
}

impl ImpactBreakdown {
    pub const ZERO: ImpactBreakdown = ImpactBreakdown {
        temporary_bps: 0.0,
        permanent_bps: 0.0,
        total_bps: 0.0,
    };

    pub fn from_bps(temporary_bps: f64, permanent_bps: f64) -> Self {
        Self {
            temporary_bps,
            permanent_bps,
            total_bps: temporary_bps + permanent_bps,
        }
    }

    /// Impact expressed as a price move from `reference_price`
    pub fn price_move(&self, reference_price: f64) -> f64 {
        self.total_bps * reference_price / 10_000.0
    }

    /// Share of the total that reverts (0 when there is no impact)
    pub fn temporary_fraction(&self) -> f64 {
        if self.total_bps == 0.0 {
            0.0
        } else {
            self.temporary_bps / self.total_bps
        }
    }
}

impl Default for ImpactBreakdown {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bps() {
        let impact = ImpactBreakdown::from_bps(2.0, 8.0);
        assert!((impact.total_bps - 10.0).abs() < 1e-12);
        assert!((impact.temporary_fraction() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_price_move() {
        let impact = ImpactBreakdown::from_bps(0.0, 10.0);
        // 10 bps of 50 000 = 50
        assert!((impact.price_move(50_000.0) - 50.0).abs() < 1e-9);
        assert_eq!(ImpactBreakdown::default().temporary_fraction(), 0.0);
    }
}
