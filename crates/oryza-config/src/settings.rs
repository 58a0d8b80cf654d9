//! Settings model and storage boundary

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;

/// Persisted user settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Correlation token attached to every API call as the bearer credential
    pub user_token: String,
    /// Whether edits are scanned for trigger points
    #[serde(default = "default_true")]
    pub trigger_points: bool,
    /// Whether the server may store the submitted context
    #[serde(default)]
    pub store_context: bool,
    /// Whether the user dismissed the survey prompt
    #[serde(default)]
    pub ignore_survey: bool,
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// Fresh settings with a newly generated user token
    pub fn generate() -> Self {
        Self {
            user_token: Uuid::new_v4().simple().to_string(),
            trigger_points: true,
            store_context: false,
            ignore_survey: false,
        }
    }
}

/// Storage boundary for the serialized settings payload
///
/// Hosts back this with their secure credential storage; the core never touches
/// the underlying mechanism.
pub trait SettingsStore: Send + Sync {
    /// Read the persisted payload, `None` on first run
    fn read(&self) -> Result<Option<String>>;

    /// Persist the payload
    fn write(&self, payload: &str) -> Result<()>;
}

/// In-memory [`SettingsStore`] for embedding hosts and tests
#[derive(Default)]
pub struct MemorySettingsStore {
    slot: Mutex<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        *self.slot.lock() = Some(payload.to_string());
        Ok(())
    }
}

/// Session-scoped settings handle
///
/// Loaded once at session start; mutations go through the setters and reach the
/// store only on an explicit [`save`](SettingsManager::save).
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    settings: Mutex<Settings>,
}

impl SettingsManager {
    /// Load settings from the store, generating and persisting fresh settings on
    /// first run
    pub fn load_or_init(store: Arc<dyn SettingsStore>) -> Result<Self> {
        let settings = match store.read()? {
            Some(payload) => {
                debug!("loaded persisted settings");
                serde_json::from_str(&payload)?
            }
            None => {
                let settings = Settings::generate();
                info!("no persisted settings found, generated a new user token");
                store.write(&serde_json::to_string(&settings)?)?;
                settings
            }
        };
        Ok(Self {
            store,
            settings: Mutex::new(settings),
        })
    }

    /// Snapshot of the current settings
    pub fn settings(&self) -> Settings {
        self.settings.lock().clone()
    }

    pub fn user_token(&self) -> String {
        self.settings.lock().user_token.clone()
    }

    pub fn trigger_points(&self) -> bool {
        self.settings.lock().trigger_points
    }

    pub fn store_context(&self) -> bool {
        self.settings.lock().store_context
    }

    pub fn ignore_survey(&self) -> bool {
        self.settings.lock().ignore_survey
    }

    pub fn set_trigger_points(&self, enabled: bool) {
        self.settings.lock().trigger_points = enabled;
    }

    pub fn set_store_context(&self, enabled: bool) {
        self.settings.lock().store_context = enabled;
    }

    pub fn set_ignore_survey(&self, ignored: bool) {
        self.settings.lock().ignore_survey = ignored;
    }

    /// Persist the current settings back to the store
    pub fn save(&self) -> Result<()> {
        let payload = serde_json::to_string(&*self.settings.lock())?;
        self.store.write(&payload)
    }
}

impl std::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsManager")
            .field("settings", &*self.settings.lock())
            .finish()
    }
}
