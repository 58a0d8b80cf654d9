//! Wire types for the prediction service

use serde::{Deserialize, Serialize};

/// Autocomplete request payload
///
/// Built once per fired request and never mutated. The context parts are already
/// truncated to the deployment budget by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    /// Text before the cursor, capped at the context budget
    pub left_context: String,
    /// Text after the cursor, capped at the context budget
    pub right_context: String,
    /// Matched trigger token, absent for keybind-triggered requests where no
    /// fallback token could be derived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_point: Option<String>,
    /// Source language identifier
    pub language: String,
    /// Identifier of the host IDE
    pub ide: String,
    /// True when the request came from an explicit keybind rather than a trigger
    pub keybind: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_version: Option<String>,
    /// Whether the server is allowed to store the submitted context
    pub store_context: bool,
}

/// Autocomplete response payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteResponse {
    /// Suggested completions, possibly empty
    #[serde(default)]
    pub predictions: Vec<String>,
    /// Opaque token correlating a later verify call to this suggestion set
    pub verify_token: String,
    /// Whether the server asks to prompt the user survey
    #[serde(default)]
    pub survey: bool,
}

impl AutocompleteResponse {
    /// True when no prediction carries usable text
    pub fn is_blank(&self) -> bool {
        self.predictions.iter().all(|p| p.trim().is_empty())
    }
}

/// Verification report payload
///
/// Sent once per suggestion instance, fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Token from the autocomplete response being verified
    pub verify_token: String,
    /// The suggestion the user accepted, absent for shown-but-unaccepted ones
    pub chosen_prediction: Option<String>,
    /// The text the user actually ended up with on the affected line
    pub ground_truth: String,
}

/// Verification acknowledgement; the server sends an empty object
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {}
