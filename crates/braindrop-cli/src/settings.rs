//! Persistent CLI settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use braindrop_core::util::{is_http_url, normalize_text_option};
use braindrop_core::{ClientConfig, TagOrder};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliSettings {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub tag_order: TagOrder,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("braindrop").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

impl CliSettings {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut settings = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        settings.normalize();
        Ok(settings)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Reject values the HTTP client would refuse later.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.api_base_url {
            if !is_http_url(url) {
                return Err("api_base_url must include http:// or https://".to_string());
            }
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Client settings with the stored overrides applied.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.api_base_url {
            config = config.with_api_base_url(url.clone());
        }
        if let Some(seconds) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        config
    }

    fn normalize(&mut self) {
        self.version = default_config_version();
        self.api_base_url = normalize_text_option(self.api_base_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
    }
}
