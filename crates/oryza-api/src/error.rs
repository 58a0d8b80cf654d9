//! Prediction API error types

use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Prediction API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// An autocomplete request was issued while another is still outstanding.
    /// Recovered locally by not firing a second popup; never shown to the user.
    #[error("an autocomplete request is already in flight")]
    AlreadyInFlight,

    /// Non-success response from the server, with the parsed error message when
    /// the body carried one
    #[error("{message} (HTTP {status})")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Network or IO failure with no parseable body
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid client configuration
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}
