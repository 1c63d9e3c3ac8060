use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upstream API base URL
pub const DEFAULT_API_BASE: &str = "https://api.quran.com/api/v4";
/// Default translation resource (Dr. Mustafa Khattab, The Clear Quran)
pub const DEFAULT_TRANSLATION: u32 = 131;
/// Default reciter (Mishari Rashid al-`Afasy)
pub const DEFAULT_RECITER: u32 = 7;

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout enforced by the HTTP transport
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Translation used when a caller asks for none
    #[serde(default = "default_translation")]
    pub default_translation: u32,

    #[serde(default = "default_reciter")]
    pub default_reciter: u32,
}

impl ApiConfig {
    /// Create an API config pointing at a different base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

const fn default_timeout_seconds() -> u64 {
    30
}

const fn default_translation() -> u32 {
    DEFAULT_TRANSLATION
}

const fn default_reciter() -> u32 {
    DEFAULT_RECITER
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            default_translation: default_translation(),
            default_reciter: default_reciter(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds (0 = caching disabled)
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Maximum number of cached responses
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl CacheConfig {
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

const fn default_ttl_seconds() -> u64 {
    3600
}

const fn default_max_entries() -> u64 {
    1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/quran-client/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("quran-client").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        let base_url = &self.api.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(crate::error::Error::ConfigInvalid {
                field: "api.base_url".to_string(),
                reason: format!("'{base_url}' is not an http(s) URL"),
            });
        }

        if self.cache.max_entries == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "cache.max_entries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
