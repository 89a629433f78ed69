//! CLI command implementations.

pub mod cart;
pub mod path;

use anyhow::Result;
use gomarket_store::StoreConfig;

use crate::Cli;

/// Loads the store config, applying command-line overrides.
pub async fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_from(path).await?,
        None => StoreConfig::load().await?,
    };
    if let Some(dir) = &cli.storage_dir {
        config.storage_dir = Some(dir.clone());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gomarket_core::ItemOrdering;
    use std::ffi::OsStr;

    #[tokio::test]
    async fn test_load_config_applies_storage_dir_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let saved = StoreConfig {
            ordering: ItemOrdering::MoveToEnd,
            ..StoreConfig::default()
        };
        saved.save_to(&config_path).await.unwrap();

        let storage_dir = temp_dir.path().join("records");
        let cli = Cli::parse_from([
            OsStr::new("gomarket"),
            OsStr::new("--config"),
            config_path.as_os_str(),
            OsStr::new("--storage-dir"),
            storage_dir.as_os_str(),
            OsStr::new("show"),
        ]);

        let config = load_config(&cli).await.unwrap();

        assert_eq!(config.ordering, ItemOrdering::MoveToEnd);
        assert_eq!(config.storage_dir(), storage_dir);
    }

    #[tokio::test]
    async fn test_load_config_missing_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("absent.json");
        let cli = Cli::parse_from([
            OsStr::new("gomarket"),
            OsStr::new("--config"),
            missing.as_os_str(),
        ]);

        let config = load_config(&cli).await.unwrap();

        assert_eq!(config.storage_key, gomarket_store::CART_STORAGE_KEY);
        assert!(cli.command.is_none());
    }
}
