//! # Store Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ROCKETSHOES_API_URL=http://catalogue.local:3333                    │
//! │     ROCKETSHOES_DB_PATH=/tmp/cart.db                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cart/config.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.rocketshoes.cart/config.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3333, <data dir>/cart.db, @RocketShoes:cart       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:3333"
//! # timeout_secs = 10   # unset: no timeout
//!
//! [storage]
//! database_path = "/home/me/.local/share/cart/cart.db"
//! cart_key = "@RocketShoes:cart"
//! ```

use rocketshoes_core::CART_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{StoreError, StoreResult};

/// Env var overriding `api.base_url`.
pub const ENV_API_URL: &str = "ROCKETSHOES_API_URL";

/// Env var overriding `storage.database_path`.
pub const ENV_DB_PATH: &str = "ROCKETSHOES_DB_PATH";

// =============================================================================
// API Settings
// =============================================================================

/// Where the catalogue lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Catalogue base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. `None` waits as long as the
    /// connection stays open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the cart is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Key the cart blob is stored under. Changing it orphans existing carts.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("cart.db"))
        .unwrap_or_else(|| PathBuf::from("cart.db"))
}

fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            cart_key: default_cart_key(),
        }
    }
}

// =============================================================================
// Main Store Configuration
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file. Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> StoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves configuration as TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = self.to_toml()?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(format!(
                "Catalogue URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == Some(0) {
            return Err(StoreError::InvalidConfig(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.cart_key.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "storage.cart_key must not be empty".into(),
            ));
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig(
                "storage.database_path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "Overriding catalogue URL from environment");
            self.api.base_url = url;
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "rocketshoes", "cart")
}
