use thiserror::Error;

/// Errors reported by a market data source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Connection closed by peer")]
    Closed,

    #[error("Malformed message: {0}")]
    Parse(String),

    /// A finite source has no more books
    #[error("Feed exhausted")]
    Exhausted,
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Errors reported by a history store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
