use costsim_estimators::CostError;
use costsim_gateway::GatewayError;
use costsim_ports::{FeedError, StoreError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cost model error: {0}")]
    Cost(#[from] CostError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type RunnerResult<T> = Result<T, RunnerError>;
