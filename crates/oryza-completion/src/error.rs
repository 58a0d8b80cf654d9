//! Completion core error types

use thiserror::Error;

/// Completion result type
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Completion core errors
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Invalid trigger-point table: {0}")]
    TriggerTable(#[from] serde_json::Error),

    #[error("Prediction API error: {0}")]
    Api(#[from] oryza_api::ApiError),
}
