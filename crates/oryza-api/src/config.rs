//! Prediction API client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Prediction API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the prediction service, including the version prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config pointed at a non-default deployment
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

fn default_base_url() -> String {
    "https://code4me.me/api/v1".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("oryza/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_populated() {
        let config = ApiConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("oryza/"));
    }

    #[test]
    fn with_base_url_overrides_endpoint_only() {
        let config = ApiConfig::with_base_url("http://localhost:8080/api/v1");
        assert_eq!(config.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
