//! Cost model errors

use costsim_execution::DomainError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    #[error("No market: order book has no two-sided quote")]
    NoMarket,

    #[error("Impact model rejected the scenario: {0}")]
    Domain(#[from] DomainError),
}

pub type CostResult<T> = std::result::Result<T, CostError>;
