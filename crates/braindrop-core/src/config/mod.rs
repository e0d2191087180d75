//! Runtime configuration shared by Braindrop clients.
//!
//! Provides the HTTP client settings for talking to raindrop.io and the
//! filesystem locations of the local snapshot and the saved API token.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

/// Public raindrop.io REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.raindrop.io/rest/v1";
/// User agent sent with every API call.
pub const DEFAULT_USER_AGENT: &str =
    concat!("Braindrop/", env!("CARGO_PKG_VERSION"), " (https://github.com/braindrop-rs/braindrop)");
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const APP_DIR_NAME: &str = "braindrop";
const DATA_FILE_NAME: &str = "raindrops.json";
const TOKEN_FILE_NAME: &str = "token";

/// Settings for the raindrop.io HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub user_agent: String,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Use a different API base URL (self-hosted proxies, tests).
    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validated base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> Result<String> {
        let base = normalize_text_option(Some(self.api_base_url.clone())).ok_or_else(|| {
            Error::Config("api_base_url must not be empty".to_string())
        })?;
        if is_http_url(&base) {
            Ok(base.trim_end_matches('/').to_string())
        } else {
            Err(Error::Config(
                "api_base_url must include http:// or https://".to_string(),
            ))
        }
    }
}

/// Where Braindrop keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    data_file: PathBuf,
    token_file: PathBuf,
}

impl AppPaths {
    /// Paths rooted at the platform data and config directories.
    pub fn resolve() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("Failed to resolve data directory".to_string()))?;
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Failed to resolve config directory".to_string()))?;
        Ok(Self {
            data_file: data_dir.join(APP_DIR_NAME).join(DATA_FILE_NAME),
            token_file: config_dir.join(APP_DIR_NAME).join(TOKEN_FILE_NAME),
        })
    }

    /// Keep everything under one directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_file: dir.join(DATA_FILE_NAME),
            token_file: dir.join(TOKEN_FILE_NAME),
        }
    }

    #[must_use]
    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_base_url_strips_trailing_slash() {
        let config = ClientConfig::default().with_api_base_url("https://example.com/rest/v1/");
        assert_eq!(
            config.normalized_base_url().unwrap(),
            "https://example.com/rest/v1"
        );
    }

    #[test]
    fn normalized_base_url_rejects_missing_scheme() {
        let config = ClientConfig::default().with_api_base_url("api.raindrop.io");
        assert!(config.normalized_base_url().is_err());
        let empty = ClientConfig::default().with_api_base_url("  ");
        assert!(empty.normalized_base_url().is_err());
    }

    #[test]
    fn in_dir_places_files_together() {
        let paths = AppPaths::in_dir("/tmp/braindrop-test");
        assert_eq!(
            paths.data_file(),
            Path::new("/tmp/braindrop-test/raindrops.json")
        );
        assert_eq!(paths.token_file(), Path::new("/tmp/braindrop-test/token"));
    }

    #[test]
    fn client_config_timeout_serializes_as_seconds() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 5);
        let parsed: ClientConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }
}
