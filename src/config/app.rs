// src/config/app.rs
use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR_NAME: &str = "closer-insight";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ENV_PREFIX: &str = "CLOSER_INSIGHT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where records and the profile live. Falls back to the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub notification_lifetime_secs: u64,
    pub knowledge_cache_ttl_secs: u64,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            notification_lifetime_secs: 5,
            knowledge_cache_ttl_secs: 10 * 60,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Layers the optional user config file and `CLOSER_INSIGHT__*` variables
    /// over the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_secs(self.notification_lifetime_secs)
    }

    pub fn knowledge_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.knowledge_cache_ttl_secs)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}
