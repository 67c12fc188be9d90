//! Application configuration management.
//!
//! Configuration is stored at `~/.config/littlelemon/config.json` and is
//! entirely optional; every field falls back to a built-in default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_MENU_URL, DEFAULT_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "littlelemon";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Override for the menu document URL
    pub menu_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Override for where the menu cache is kept
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_dir()?)
    }

    /// Load `config.json` from a specific directory
    pub fn load_from(dir: impl Into<PathBuf>) -> Result<Self> {
        let path = dir.into().join(CONFIG_FILE);
        if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Directory holding the config file and user preferences
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn menu_url(&self) -> &str {
        self.menu_url.as_deref().unwrap_or(DEFAULT_MENU_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
