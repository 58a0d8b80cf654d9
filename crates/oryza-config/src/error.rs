//! Settings error types

use thiserror::Error;

/// Settings result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Settings storage error: {0}")]
    Storage(String),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
