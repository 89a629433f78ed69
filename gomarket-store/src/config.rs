//! Store configuration.
//!
//! Loaded from `config.json` in the config directory; every field is
//! optional and falls back to its default.

use gomarket_core::ItemOrdering;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, default_storage_dir, load_json, save_json};
use crate::retry::PersistRetry;

/// Storage key the cart snapshot is written under.
pub const CART_STORAGE_KEY: &str = "@GoMarket:prod";

/// Key older releases tried to read the cart from on startup.
pub const LEGACY_CART_STORAGE_KEY: &str = "@GoMarket:prods";

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the cart is read from and written to.
    pub storage_key: String,
    /// Keys to fall back to on hydration when `storage_key` has no record.
    pub legacy_read_keys: Vec<String>,
    /// Directory for file-backed storage. `None` uses the platform default.
    pub storage_dir: Option<PathBuf>,
    /// Where a line goes when its quantity changes.
    pub ordering: ItemOrdering,
    /// Write the `[[...]]` shape when a decrement removes a line, for
    /// readers that expect it.
    pub legacy_nested_snapshot: bool,
    /// Retry policy for storage writes.
    pub retry: PersistRetry,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: CART_STORAGE_KEY.to_string(),
            legacy_read_keys: vec![LEGACY_CART_STORAGE_KEY.to_string()],
            storage_dir: None,
            ordering: ItemOrdering::default(),
            legacy_nested_snapshot: false,
            retry: PersistRetry::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or is invalid.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or is invalid.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !tokio::fs::try_exists(path).await? {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config: StoreConfig = load_json(path).await?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks the configuration for values the store cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.storage_key.is_empty() {
            return Err(StoreError::Config("storage_key must not be empty".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(StoreError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the storage directory, resolving the platform default.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }

    /// Keys to try on hydration, primary key first.
    pub fn read_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.storage_key.as_str()).chain(
            self.legacy_read_keys
                .iter()
                .map(String::as_str)
                .filter(move |k| *k != self.storage_key),
        )
    }
}
