//! App-level configuration, layered over the engine's interaction tuning.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use canvas::config::{ConfigError, InteractionConfig};
use serde::{Deserialize, Serialize};

/// Storage key the save snapshot lives under.
pub const DEFAULT_SAVE_KEY: &str = "save-data";

/// Quiet period before a burst of edits is written out.
pub const DEFAULT_SAVE_DEBOUNCE_MS: u32 = 500;

#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Interaction(#[from] ConfigError),
    #[error("saveKey must not be empty")]
    EmptySaveKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub save_key: String,
    pub save_debounce_ms: u32,
    /// Retry a save without image payloads when the full snapshot does not fit.
    pub strip_images_on_quota: bool,
    pub interaction: InteractionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_key: DEFAULT_SAVE_KEY.to_owned(),
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            strip_images_on_quota: true,
            interaction: InteractionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppConfigError`] for malformed JSON or out-of-range values.
    pub fn from_json(raw: &str) -> Result<Self, AppConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        if config.save_key.is_empty() {
            return Err(AppConfigError::EmptySaveKey);
        }
        config.interaction.validate()?;
        Ok(config)
    }
}
