use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::utils::errors::SettingsError;

pub const DEFAULT_SETTINGS_FILE: &str = "durak-client";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub identity_file: String,
    pub notification_ms: u64,
    pub log_level: String,
}

impl Settings {
    /// Loads settings from an optional file, then `DURAK_*` environment variables.
    ///
    /// # Arguments
    /// * `file` - Settings file name without extension; `durak-client` when `None`.
    ///
    /// # Returns
    /// * `Ok(Settings)` - Settings with defaults filled in for anything unset.
    /// * `Err(SettingsError)` - If a source exists but cannot be parsed.
    pub fn load(file: Option<&str>) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("server_url", "http://127.0.0.1:8000")?
            .set_default("identity_file", "durak-identity.json")?
            .set_default("notification_ms", 2500)?
            .set_default("log_level", "WARN")?
            .add_source(File::with_name(file.unwrap_or(DEFAULT_SETTINGS_FILE)).required(false))
            .add_source(Environment::with_prefix("DURAK"))
            .build()?;

        Ok(settings.try_deserialize::<Settings>()?)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            identity_file: "durak-identity.json".to_string(),
            notification_ms: 2500,
            log_level: "WARN".to_string(),
        }
    }
}
