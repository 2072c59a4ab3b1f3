//! Execution Application Layer
//!
//! The three engine operations, as free functions over
//! [`MarketImpactParameters`](crate::domain::MarketImpactParameters).

mod impact;
mod trajectory;

pub use impact::{compute_market_impact, estimate_execution_cost, impact_breakdown};
pub use trajectory::{TRAJECTORY_POINTS, compute_optimal_trajectory};
