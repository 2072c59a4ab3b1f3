//! Almgren-Chriss Optimal Trajectory
//!
//! Strategy: minimize expected impact cost + risk.
//!
//! Optimal solution (Almgren-Chriss 2000):
//! x(t) = X × sinh(κ(τ-t)) / sinh(κτ),   κ = √(γ/η)
//!
//! Shape depends on κ:
//!
//!   High κ (urgent):          Low κ (patient):
//!   ↑                         ↑
//!   │█                        │█
//!   │ █                       │ ██
//!   │  ██                     │   ███
//!   │    ████████             │      █████
//!   └────────→ time           └────────────→ time
//!   (front-loaded)            (close to linear)

use crate::domain::{ExecutionTrajectory, MarketImpactParameters};
use crate::error::DomainResult;

/// Number of grid points in every trajectory, both ends included
pub const TRAJECTORY_POINTS: usize = 100;

/// Above this κτ, sinh(κτ) is too close to f64 overflow for the direct ratio
const DIRECT_RATIO_LIMIT: f64 = 500.0;

/// Below this κτ, sinh(κτ) = κτ to f64 precision and the schedule is linear
const LINEAR_LIMIT: f64 = 1e-8;

/// Compute the optimal execution schedule
///
/// Returns [`TRAJECTORY_POINTS`] equally spaced times covering `[0, τ]`
/// (the last one is exactly τ) and the remaining quantity at each of them.
/// The first quantity is the total quantity and the last one is zero.
///
/// # Errors
/// [`DomainError`](crate::DomainError) when τ, η or γ is not positive, or
/// any parameter is not finite.
pub fn compute_optimal_trajectory(
    params: &MarketImpactParameters,
) -> DomainResult<ExecutionTrajectory> {
    params.validate_for_trajectory()?;

    let tau = params.tau;
    let kappa = params.kappa();
    let kappa_tau = kappa * tau;
    let times = time_grid(tau);

    let quantities = times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let fraction = if !kappa_tau.is_finite() {
                // κ → ∞: everything executes at the first instant
                if i == 0 { 1.0 } else { 0.0 }
            } else if kappa_tau < LINEAR_LIMIT {
                // κ → 0: sinh(a)/sinh(b) → a/b
                (tau - t) / tau
            } else {
                sinh_ratio(kappa * (tau - t), kappa_tau)
            };
            params.total_quantity * fraction
        })
        .collect();

    Ok(ExecutionTrajectory::new(times, quantities))
}

/// `TRAJECTORY_POINTS` equally spaced points from 0 to `tau` inclusive
fn time_grid(tau: f64) -> Vec<f64> {
    let last = TRAJECTORY_POINTS - 1;
    let step = tau / last as f64;
    (0..TRAJECTORY_POINTS)
        .map(|i| if i == last { tau } else { i as f64 * step })
        .collect()
}

/// sinh(a) / sinh(b) for 0 ≤ a ≤ b, b > 0
///
/// For large `b` the identity
/// sinh(a)/sinh(b) = e^(a-b) × (1 - e^(-2a)) / (1 - e^(-2b))
/// keeps every intermediate finite.
fn sinh_ratio(a: f64, b: f64) -> f64 {
    if b <= DIRECT_RATIO_LIMIT {
        a.sinh() / b.sinh()
    } else {
        (a - b).exp() * (-(-2.0 * a).exp_m1()) / (-(-2.0 * b).exp_m1())
    }
}
