//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the portal server URL, the external social-login and registration URLs,
//! and the last identifier used to sign in.
//!
//! Configuration is stored at `~/.config/portal-tui/config.json`. The
//! server URL can be overridden with the `PORTAL_SERVER_URL` environment
//! variable (a `.env` file is honored).

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "portal-tui";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default portal server URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Environment variable overriding the portal server URL.
pub const SERVER_URL_ENV: &str = "PORTAL_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// External social-login URL. The hand-off happens in a browser; the
    /// TUI only surfaces the address.
    #[serde(default)]
    pub social_login_url: Option<String>,
    /// External registration URL, surfaced the same way.
    #[serde(default)]
    pub register_url: Option<String>,
    /// Identifier from the last successful login, used to prefill the form.
    #[serde(default)]
    pub last_identifier: Option<String>,
    /// Cache directory override. When unset the platform cache dir is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Config file path override. Not part of the file format; when unset
    /// the platform config dir is used.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            social_login_url: None,
            register_url: None,
            last_identifier: None,
            cache_dir: None,
            config_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.is_empty() {
                config.server_url = url;
            }
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = match self.config_path {
            Some(ref p) => p.clone(),
            None => Self::default_config_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
