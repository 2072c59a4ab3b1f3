//! Error types for the gateway crate

use costsim_ports::FeedError;
use thiserror::Error;

/// Gateway-level errors (message processing and connections)
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Message parse error: {0}")]
    Parse(String),

    #[error("No order book received yet")]
    NoOrderBook,

    #[error("Order book has an empty side")]
    EmptySide,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Parse(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        GatewayError::Connection(e.to_string())
    }
}

impl From<GatewayError> for FeedError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Connection(reason) => FeedError::Connection(reason),
            GatewayError::Io(e) => FeedError::Connection(e.to_string()),
            other => FeedError::Parse(other.to_string()),
        }
    }
}
