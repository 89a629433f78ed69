//! Path command - show where config and cart data live.

use anyhow::Result;
use gomarket_store::{FileStorage, StoreConfig};
use serde::Serialize;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PathsOutput {
    config_file: String,
    storage_dir: String,
    cart_file: String,
    storage_key: String,
}

/// Runs the path command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = super::load_config(cli).await?;
    let config_file = cli.config.clone().unwrap_or_else(StoreConfig::default_path);
    let storage = FileStorage::new(config.storage_dir());
    let cart_file = storage.path_for(&config.storage_key)?;

    let paths = PathsOutput {
        config_file: config_file.display().to_string(),
        storage_dir: storage.dir().display().to_string(),
        cart_file: cart_file.display().to_string(),
        storage_key: config.storage_key.clone(),
    };

    match cli.format {
        OutputFormat::Text => {
            println!("Config file:  {}", paths.config_file);
            println!("Storage dir:  {}", paths.storage_dir);
            println!("Cart file:    {}", paths.cart_file);
            println!("Storage key:  {}", paths.storage_key);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}
