//! Completion core configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Context budget used by the compact historical deployment
pub const COMPACT_CONTEXT_BUDGET: usize = 2048;

/// Context budget used by the extended historical deployment
pub const EXTENDED_CONTEXT_BUDGET: usize = 3992;

/// Completion core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Maximum characters kept on each side of the cursor in the request payload
    #[serde(default = "default_context_budget")]
    pub context_budget: usize,

    /// Delay between showing/accepting a suggestion and sampling the ground truth
    #[serde(default = "default_verify_delay")]
    pub verify_delay: Duration,

    /// Identifier of the host IDE, sent with every request
    #[serde(default = "default_ide")]
    pub ide: String,

    /// Optional plugin version, sent with every request when known
    #[serde(default)]
    pub plugin_version: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            context_budget: default_context_budget(),
            verify_delay: default_verify_delay(),
            ide: default_ide(),
            plugin_version: None,
        }
    }
}

fn default_context_budget() -> usize {
    EXTENDED_CONTEXT_BUDGET
}

fn default_verify_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_ide() -> String {
    "oryza".to_string()
}
