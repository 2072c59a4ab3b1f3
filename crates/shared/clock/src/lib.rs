//! Costsim Clock Infrastructure
//!
//! Time sources behind the [`Clock`] port:
//!
//! ```text
//! SystemClock   wall time, production
//! FixedClock    frozen time, moved explicitly by tests and replays
//! ```

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use costsim_ports::Clock;
