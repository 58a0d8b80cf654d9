//! Prediction client implementation

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::types::{AutocompleteRequest, AutocompleteResponse, VerifyRequest, VerifyResponse};

const AUTOCOMPLETE_ENDPOINT: &str = "/prediction/autocomplete";
const VERIFY_ENDPOINT: &str = "/prediction/verify";

/// Mockable prediction service seam
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Fetch a suggestion set. Subject to single-flight admission: fails with
    /// [`ApiError::AlreadyInFlight`] while a previous fetch is outstanding.
    async fn autocomplete(&self, request: &AutocompleteRequest) -> Result<AutocompleteResponse>;

    /// Report the verification sample. Not subject to the single-flight lock;
    /// calls may overlap with each other and with autocomplete fetches.
    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse>;
}

/// Production prediction client
pub struct PredictionClient {
    http: reqwest::Client,
    config: ApiConfig,
    user_token: String,
    in_flight: AtomicBool,
}

impl PredictionClient {
    /// Create a client for one editor session
    ///
    /// `user_token` is the correlation token from settings, attached to every
    /// call as the bearer credential.
    pub fn new(config: ApiConfig, user_token: impl Into<String>) -> Result<Self> {
        url::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::BuildError(e.to_string()))?;

        Ok(Self {
            http,
            config,
            user_token: user_token.into(),
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Acquire the single-flight lock, released by the returned guard
    fn try_acquire(&self) -> Result<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::AlreadyInFlight)?;
        Ok(FlightGuard(&self.in_flight))
    }
}

#[async_trait]
impl PredictionApi for PredictionClient {
    async fn autocomplete(&self, request: &AutocompleteRequest) -> Result<AutocompleteResponse> {
        let _guard = self.try_acquire()?;

        debug!(
            trigger = request.trigger_point.as_deref().unwrap_or("<keybind>"),
            language = %request.language,
            "dispatching autocomplete request"
        );

        let response = self
            .http
            .post(self.endpoint(AUTOCOMPLETE_ENDPOINT))
            .bearer_auth(&self.user_token)
            .json(request)
            .send()
            .await?;

        classify(response).await
    }

    async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse> {
        debug!(verify_token = %request.verify_token, "dispatching verify report");

        let response = self
            .http
            .post(self.endpoint(VERIFY_ENDPOINT))
            .bearer_auth(&self.user_token)
            .json(request)
            .send()
            .await?;

        classify(response).await
    }
}

/// Releases the single-flight lock unconditionally, success or failure
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Classify a raw response: 2xx with a JSON body deserializes into the typed
/// response, anything else becomes [`ApiError::Server`] carrying the parsed
/// error message when available or the raw body otherwise.
async fn classify<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    if status.is_success() && is_json {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) => body,
    };
    warn!(%status, "prediction service returned an error response");
    Err(ApiError::Server { status, message })
}
