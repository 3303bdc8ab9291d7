//! Controller configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::REQUIRED_FIELDS;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for a [`FormController`](crate::controller::FormController).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormConfig {
    /// Store key holding the snapshot blob
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Field ids that must be non-empty to submit
    #[serde(default = "default_required_fields")]
    pub required_fields: Vec<String>,

    /// Quiet period before an autosave
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Lifetime of a transient notification
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,

    /// Hospital contacts present before any are added
    #[serde(default = "default_hospital_seed")]
    pub hospital_contact_seed: u32,

    /// ZOLL contacts present before any are added
    #[serde(default = "default_zoll_seed")]
    pub zoll_contact_seed: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            required_fields: default_required_fields(),
            autosave_delay_ms: default_autosave_delay_ms(),
            notification_ttl_ms: default_notification_ttl_ms(),
            hospital_contact_seed: default_hospital_seed(),
            zoll_contact_seed: default_zoll_seed(),
        }
    }
}

// Serde default helpers
fn default_storage_key() -> String {
    "educatorFormData".to_string()
}

fn default_required_fields() -> Vec<String> {
    REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_autosave_delay_ms() -> u64 {
    1000
}

fn default_notification_ttl_ms() -> u64 {
    5000
}

fn default_hospital_seed() -> u32 {
    1
}

fn default_zoll_seed() -> u32 {
    2
}

impl FormConfig {
    /// Parse from JSON; omitted keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Reject settings the controller cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key is empty".into()));
        }
        if self.autosave_delay_ms == 0 {
            return Err(ConfigError::Invalid("autosave_delay_ms must be positive".into()));
        }
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::Invalid("notification_ttl_ms must be positive".into()));
        }
        Ok(())
    }
}
