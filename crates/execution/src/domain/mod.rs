//! Execution Domain Types
//!
//! Value objects consumed and produced by the Almgren-Chriss engine.

mod impact;
mod parameters;
mod trajectory;

pub use impact::ImpactBreakdown;
pub use parameters::MarketImpactParameters;
pub use trajectory::ExecutionTrajectory;
