//! Prediction API client for Oryza
//!
//! JSON-over-HTTPS client for the prediction service, in the shape the rest of the
//! workspace consumes:
//!
//! - **Trait-based design**: mockable via [`PredictionApi`]
//! - **Single-flight**: at most one autocomplete request in flight per client;
//!   a second attempt fails fast with [`ApiError::AlreadyInFlight`]
//! - **Fire-and-forget verification**: verify calls bypass the single-flight lock
//!   and may overlap freely
//! - **Response classification**: 2xx + JSON deserializes into the typed
//!   response, anything else becomes [`ApiError::Server`] with the parsed error
//!   message when the body carries one
//! - **Bearer auth**: the user correlation token is attached to every call

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{PredictionApi, PredictionClient};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use types::{AutocompleteRequest, AutocompleteResponse, VerifyRequest, VerifyResponse};

/// Re-export commonly used types
pub use reqwest::StatusCode;
