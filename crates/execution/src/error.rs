//! Error types for the execution engine

use thiserror::Error;

/// A precondition of the closed-form model was violated.
///
/// Every variant names the parameter that made the expression undefined so the
/// caller can surface it without inspecting the inputs again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Execution horizon must be positive (tau = {0})")]
    NonPositiveHorizon(f64),

    #[error("Execution time must be positive (time = {0})")]
    NonPositiveTime(f64),

    #[error("Initial price must be positive (initial_price = {0})")]
    NonPositivePrice(f64),

    #[error("Coefficient {name} must be positive (got {value})")]
    NonPositiveCoefficient { name: &'static str, value: f64 },

    #[error("Coefficient {name} must not be negative (got {value})")]
    NegativeCoefficient { name: &'static str, value: f64 },

    #[error("Parameter {name} is not a finite number")]
    NonFinite { name: &'static str },
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
