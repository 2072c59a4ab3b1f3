//! Execution Trajectory Engine
//!
//! Closed-form Almgren-Chriss optimal execution model.
//!
//! # Model
//!
//! ```text
//! κ    = √(γ / η)
//! x(t) = X × sinh(κ(τ - t)) / sinh(κτ)          remaining quantity at t ∈ [0, τ]
//!
//! Temporary impact = η × (q / t) × (σ / √t)
//! Permanent impact = γ × q
//! Impact (bps)     = (temporary + permanent) / P₀ × 10 000
//! Cost             = q × P₀ × (1 + impact / 10 000)
//! ```
//!
//! The engine is a pure function library over [`MarketImpactParameters`]:
//! nothing is cached between calls, nothing is logged, and every operation can
//! be called concurrently from any thread.
//!
//! # Sign convention
//!
//! Quantities are signed. A positive quantity is a buy, a negative quantity is
//! a sell. Trajectory, impact and cost are odd in the quantity, so a sell
//! produces a mirrored schedule, negative impact and a negative cost
//! (proceeds received).
//!
//! # Example
//!
//! ```rust
//! use costsim_execution::{
//!     MarketImpactParameters, compute_market_impact, compute_optimal_trajectory,
//!     estimate_execution_cost,
//! };
//!
//! let params = MarketImpactParameters::new(0.1, 0.1, 0.02, 1.0, 50_000.0, 1.0);
//!
//! let trajectory = compute_optimal_trajectory(&params).unwrap();
//! assert_eq!(trajectory.len(), 100);
//!
//! let impact_bps = compute_market_impact(&params, 1.0, 1.0).unwrap();
//! let cost = estimate_execution_cost(&params, 1.0, 1.0).unwrap();
//! assert!(impact_bps >= 0.0);
//! assert!(cost > 50_000.0);
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub use application::{
    TRAJECTORY_POINTS, compute_market_impact, compute_optimal_trajectory,
    estimate_execution_cost, impact_breakdown,
};
pub use domain::{ExecutionTrajectory, ImpactBreakdown, MarketImpactParameters};
pub use error::{DomainError, DomainResult};
