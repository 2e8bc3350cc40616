//! Error types for the adapter
//!
//! Vendor declines and API errors are not errors here: they come back as a
//! failed [`crate::Response`]. These variants cover everything that prevents a
//! normalized response from being produced at all.

use thiserror::Error;

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Adapter errors
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout
    #[error("Timeout after {seconds}s: {operation}")]
    Timeout {
        /// Timeout duration
        seconds: u64,
        /// Operation
        operation: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A field the operation needs was not supplied
    #[error("Missing required option: {0}")]
    MissingField(&'static str),

    /// Amount cannot be represented on the wire
    #[error("Invalid amount: {0} minor units")]
    InvalidAmount(u64),

    /// Card data rejected before sending
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
