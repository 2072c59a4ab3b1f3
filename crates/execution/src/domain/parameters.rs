//! Model Parameters
//!
//! The six scalars that fully determine an Almgren-Chriss scenario.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Immutable parameter set for one execution scenario
///
/// Built once per query and read by the engine functions. There are no
/// setters: change a scenario by building a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketImpactParameters {
    /// Temporary-impact coefficient η (> 0)
    pub eta: f64,
    /// Permanent-impact coefficient γ (> 0)
    pub gamma: f64,
    /// Volatility of the asset over the horizon σ (≥ 0)
    pub sigma: f64,
    /// Total time horizon τ (> 0)
    pub tau: f64,
    /// Reference price at decision time P₀ (> 0)
    pub initial_price: f64,
    /// Signed quantity to execute over [0, τ]; negative is a sell
    pub total_quantity: f64,
}

impl MarketImpactParameters {
    pub fn new(
        eta: f64,
        gamma: f64,
        sigma: f64,
        tau: f64,
        initial_price: f64,
        total_quantity: f64,
    ) -> Self {
        Self {
            eta,
            gamma,
            sigma,
            tau,
            initial_price,
            total_quantity,
        }
    }

    /// Same scenario with a different total quantity
    pub fn with_total_quantity(self, total_quantity: f64) -> Self {
        Self {
            total_quantity,
            ..self
        }
    }

    /// Urgency parameter κ = √(γ / η)
    ///
    /// Only meaningful once [`validate_for_trajectory`](Self::validate_for_trajectory)
    /// has passed; with η = 0 this is infinite or NaN.
    pub fn kappa(&self) -> f64 {
        (self.gamma / self.eta).sqrt()
    }

    /// Check the preconditions of the trajectory solution
    pub fn validate_for_trajectory(&self) -> DomainResult<()> {
        self.ensure_finite()?;
        if self.tau <= 0.0 {
            return Err(DomainError::NonPositiveHorizon(self.tau));
        }
        ensure_positive("eta", self.eta)?;
        ensure_positive("gamma", self.gamma)?;
        Ok(())
    }

    /// Check the preconditions shared by the point impact and cost estimates
    ///
    /// Zero coefficients are allowed here (they just switch a component off);
    /// negative ones are not.
    pub fn validate_for_impact(&self) -> DomainResult<()> {
        self.ensure_finite()?;
        if self.initial_price <= 0.0 {
            return Err(DomainError::NonPositivePrice(self.initial_price));
        }
        ensure_non_negative("eta", self.eta)?;
        ensure_non_negative("gamma", self.gamma)?;
        ensure_non_negative("sigma", self.sigma)?;
        Ok(())
    }

    fn ensure_finite(&self) -> DomainResult<()> {
        let fields = [
            ("eta", self.eta),
            ("gamma", self.gamma),
            ("sigma", self.sigma),
            ("tau", self.tau),
            ("initial_price", self.initial_price),
            ("total_quantity", self.total_quantity),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, _)) => Err(DomainError::NonFinite { name: *name }),
            None => Ok(()),
        }
    }
}

fn ensure_positive(name: &'static str, value: f64) -> DomainResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositiveCoefficient { name, value })
    }
}

fn ensure_non_negative(name: &'static str, value: f64) -> DomainResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::NegativeCoefficient { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> MarketImpactParameters {
        MarketImpactParameters::new(0.1, 0.1, 0.02, 1.0, 50_000.0, 1.0)
    }

    #[test]
    fn test_kappa() {
        let p = MarketImpactParameters {
            gamma: 0.4,
            eta: 0.1,
            ..params()
        };
        assert!((p.kappa() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_trajectory_preconditions() {
        assert!(params().validate_for_trajectory().is_ok());

        let zero_tau = MarketImpactParameters { tau: 0.0, ..params() };
        assert_eq!(
            zero_tau.validate_for_trajectory(),
            Err(DomainError::NonPositiveHorizon(0.0))
        );

        let zero_eta = MarketImpactParameters { eta: 0.0, ..params() };
        assert!(matches!(
            zero_eta.validate_for_trajectory(),
            Err(DomainError::NonPositiveCoefficient { name: "eta", .. })
        ));

        let negative_gamma = MarketImpactParameters {
            gamma: -0.1,
            ..params()
        };
        assert!(matches!(
            negative_gamma.validate_for_trajectory(),
            Err(DomainError::NonPositiveCoefficient { name: "gamma", .. })
        ));
    }

    #[test]
    fn test_impact_preconditions() {
        // Zero coefficients are fine for point estimates
        let zero_coeffs = MarketImpactParameters {
            eta: 0.0,
            gamma: 0.0,
            sigma: 0.0,
            ..params()
        };
        assert!(zero_coeffs.validate_for_impact().is_ok());

        let zero_price = MarketImpactParameters {
            initial_price: 0.0,
            ..params()
        };
        assert_eq!(
            zero_price.validate_for_impact(),
            Err(DomainError::NonPositivePrice(0.0))
        );

        let negative_sigma = MarketImpactParameters {
            sigma: -0.01,
            ..params()
        };
        assert!(matches!(
            negative_sigma.validate_for_impact(),
            Err(DomainError::NegativeCoefficient { name: "sigma", .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let nan_quantity = params().with_total_quantity(f64::NAN);
        assert_eq!(
            nan_quantity.validate_for_trajectory(),
            Err(DomainError::NonFinite {
                name: "total_quantity"
            })
        );

        let inf_tau = MarketImpactParameters {
            tau: f64::INFINITY,
            ..params()
        };
        assert_eq!(
            inf_tau.validate_for_impact(),
            Err(DomainError::NonFinite { name: "tau" })
        );
    }

    #[test]
    fn test_error_messages_name_the_parameter() {
        let err = DomainError::NonPositiveCoefficient {
            name: "eta",
            value: 0.0,
        };
        assert!(err.to_string().contains("eta"));
        assert!(DomainError::NonPositiveTime(0.0).to_string().contains("time"));
    }
}
