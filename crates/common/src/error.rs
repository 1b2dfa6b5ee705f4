//! Universal error types for Vantage.
//!
//! Only network/protocol failures on the primary position-fetch path are
//! surfaced to callers. "No data" is an empty result, duplicate or
//! mis-attributed records are discarded locally, and price/rate outages
//! degrade to documented fallbacks.

use thiserror::Error;

/// Top-level error type for all Vantage operations.
#[derive(Debug, Error)]
pub enum VantageError {
    #[error("Protocol error ({protocol}): {message}")]
    Protocol {
        protocol: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

pub type VantageResult<T> = Result<T, VantageError>;
