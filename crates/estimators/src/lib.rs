//! Trade-Cost Estimators
//!
//! Per-tick cost models fed by the live order book:
//!
//! ```text
//!              ┌──────────────────────────────┐
//!  OrderBook ─►│ SlippageEstimator (walk/fit) │─► slippage bps ─┐
//!              ├──────────────────────────────┤                 │
//!              │ MakerTakerPredictor (logit)  │─► maker share ──┼─► fees
//!              ├──────────────────────────────┤                 │
//!              │ Almgren-Chriss impact        │─► impact bps ───┴─► net cost
//!              └──────────────────────────────┘
//! ```
//!
//! [`CostModel`] chains the three for one configured order.

pub mod cost_model;
pub mod error;
pub mod fees;
pub mod maker_taker;
pub mod slippage;

pub use cost_model::{CostEstimate, CostInputs, CostModel};
pub use error::{CostError, CostResult};
pub use fees::expected_fee;
pub use maker_taker::{MakerTakerConfig, MakerTakerPredictor, MarketFeatures};
pub use slippage::{Fill, SlippageConfig, SlippageEstimator, walk_book};
