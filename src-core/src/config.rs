//! Runtime settings for the catalog client, favorites store and filter UI.
//!
//! Provides three loading methods:
//! - `Config::default()` - Embedded defaults compiled into the binary
//! - `Config::load(path)` - Custom settings from a TOML file
//! - `Config::from_toml_str(s)` - Settings from an in-memory TOML document

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::WanderLensError;

/// Defaults embedded at compile time from `src-core/config/wanderlens.toml`.
const DEFAULT_CONFIG: &str = include_str!("../config/wanderlens.toml");

/// Environment variable that overrides `api_base_url`.
pub const API_BASE_URL_ENV: &str = "WANDERLENS_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default = "Config::builtin")]
pub struct Config {
    /// Base URL of the catalog API, without trailing slash.
    pub api_base_url: String,
    /// Storage key holding the favorites blob.
    pub favorites_key: String,
    /// Delay before a filter edit is committed to the URL.
    pub debounce_ms: u64,
    /// Number of activities shown in featured views.
    pub featured_limit: usize,
    /// Per-request timeout for the catalog API (ignored in the browser).
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            warn!("Embedded config is invalid ({}), using built-in values", e);
            Self::builtin()
        })
    }
}

impl Config {
    fn builtin() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            favorites_key: crate::favorites::DEFAULT_FAVORITES_KEY.to_string(),
            debounce_ms: crate::debounce::DEFAULT_DEBOUNCE.as_millis() as u64,
            featured_limit: crate::catalog::query::DEFAULT_FEATURED_LIMIT,
            request_timeout_secs: 10,
        }
    }

    /// Parse settings from TOML. Missing keys take their built-in value.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, WanderLensError> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| WanderLensError::Config(e.to_string()))?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply `WANDERLENS_API_BASE_URL` when it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_base_url_override(std::env::var(API_BASE_URL_ENV).ok())
    }

    /// Replace `api_base_url` when `value` is non-blank.
    pub fn with_api_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    /// Reject settings that would break the store or the filter UI.
    pub fn validate(&self) -> std::result::Result<(), WanderLensError> {
        if self.api_base_url.trim().is_empty() {
            return Err(WanderLensError::Config("api_base_url is empty".to_string()));
        }
        if self.favorites_key.trim().is_empty() {
            return Err(WanderLensError::Config("favorites_key is empty".to_string()));
        }
        if self.debounce_ms == 0 {
            return Err(WanderLensError::Config("debounce_ms must be > 0".to_string()));
        }
        if self.featured_limit == 0 {
            return Err(WanderLensError::Config("featured_limit must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
