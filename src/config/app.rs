//! Main application configuration
//!
//! This module defines the primary configuration structures for the honor-roll
//! pipeline, including environment variable loading and validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub forum: ForumSettings,
    #[serde(default)]
    pub rating: RatingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging and the HTTP user agent
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Directory holding input and output artifacts
    pub docs_dir: PathBuf,
}

/// Game API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// OAuth2 client-credentials token endpoint
    pub token_url: String,
    /// Host suffix for region-specific profile hosts (`{region}.{suffix}`)
    pub api_host_suffix: String,
    /// Locale passed to profile endpoints
    pub locale: String,
    /// Per-request timeout in seconds; a timed-out request fails alone
    pub request_timeout_seconds: u64,
}

/// Forum user API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumSettings {
    /// Base URL of the forum uAPI endpoint (required for `fetch-users`)
    pub base_url: String,
    /// Page size for the user pagination walk
    pub per_page: u32,
}

/// Rating-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSettings {
    /// Characters above this level are excluded from the ranking
    pub max_level: u32,
    /// Character count for truncated raw-body samples in error records
    pub raw_sample_chars: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "honor-roll".to_string(),
            log_level: "info".to_string(),
            docs_dir: PathBuf::from("docs"),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            token_url: "https://oauth.battle.net/token".to_string(),
            api_host_suffix: "api.blizzard.com".to_string(),
            locale: "ru_RU".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            per_page: 50,
        }
    }
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            max_level: 20,
            raw_sample_chars: 200,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(docs_dir) = env::var("DOCS_DIR") {
            config.service.docs_dir = PathBuf::from(docs_dir);
        }

        // Game API settings
        if let Ok(token_url) = env::var("API_TOKEN_URL") {
            config.api.token_url = token_url;
        }
        if let Ok(suffix) = env::var("API_HOST_SUFFIX") {
            config.api.api_host_suffix = suffix;
        }
        if let Ok(locale) = env::var("API_LOCALE") {
            config.api.locale = locale;
        }
        if let Ok(timeout) = env::var("API_REQUEST_TIMEOUT_SECONDS") {
            config.api.request_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid API_REQUEST_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Forum settings
        if let Ok(base_url) = env::var("FORUM_API_URL") {
            config.forum.base_url = base_url;
        }
        if let Ok(per_page) = env::var("FORUM_PER_PAGE") {
            config.forum.per_page = per_page
                .parse()
                .map_err(|_| anyhow!("Invalid FORUM_PER_PAGE value: {}", per_page))?;
        }

        // Rating settings
        if let Ok(max_level) = env::var("RATING_MAX_LEVEL") {
            config.rating.max_level = max_level
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_MAX_LEVEL value: {}", max_level))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Get the per-request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_seconds)
    }

    /// HTTP user agent sent to both upstream APIs
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.service.name, crate::VERSION)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate game API settings
    if config.api.token_url.is_empty() {
        return Err(anyhow!("API token URL cannot be empty"));
    }
    if config.api.api_host_suffix.is_empty() {
        return Err(anyhow!("API host suffix cannot be empty"));
    }
    if config.api.request_timeout_seconds == 0 {
        return Err(anyhow!("API request timeout must be greater than 0"));
    }

    // Validate forum settings; base_url stays optional here because only the
    // fetch-users stage needs it
    if config.forum.per_page == 0 {
        return Err(anyhow!("Forum page size must be greater than 0"));
    }

    // Validate rating settings
    if config.rating.max_level == 0 {
        return Err(anyhow!("Rating max level must be greater than 0"));
    }
    if config.rating.raw_sample_chars == 0 {
        return Err(anyhow!("Raw sample length must be greater than 0"));
    }

    Ok(())
}
