//! Session settings for Oryza
//!
//! Settings live in the host IDE's secure credential storage; the core only sees
//! the [`SettingsStore`] boundary. [`SettingsManager`] loads the persisted JSON
//! payload once at session start (generating a fresh user token on first run) and
//! writes it back only through an explicit [`SettingsManager::save`].

pub mod error;
pub mod settings;

pub use error::{ConfigError, Result};
pub use settings::{MemorySettingsStore, Settings, SettingsManager, SettingsStore};
