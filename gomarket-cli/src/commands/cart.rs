//! Cart commands - show and edit the persisted cart.

use anyhow::{Context, Result, bail};
use clap::Args;
use gomarket_core::{Cart, Product};
use gomarket_store::{CartStore, FileStorage, HydrationOutcome};
use std::sync::Arc;
use tracing::{debug, info};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the add command.
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Product id.
    #[arg(long)]
    pub id: String,

    /// Product title.
    #[arg(long)]
    pub title: String,

    /// Product image URL.
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(long)]
    pub price: f64,
}

impl AddArgs {
    fn to_product(&self) -> Product {
        Product::new(&self.id, &self.title, &self.image_url, self.price)
    }
}

/// Opens the configured storage without reading the saved cart.
async fn connect_store(cli: &Cli) -> Result<CartStore> {
    let config = super::load_config(cli).await?;
    let dir = config.storage_dir();
    let storage = FileStorage::open(&dir)
        .await
        .with_context(|| format!("cannot open storage at {}", dir.display()))?;

    Ok(CartStore::with_config(Arc::new(storage), config))
}

/// Opens the configured storage and loads the saved cart.
async fn open_store(cli: &Cli) -> Result<CartStore> {
    let store = connect_store(cli).await?;
    match store.hydrate().await {
        HydrationOutcome::Failed(e) => bail!("saved cart could not be read: {e}"),
        outcome => debug!(?outcome, "Cart loaded"),
    }
    Ok(store)
}

/// Fails if the last write did not reach storage.
async fn ensure_persisted(store: &CartStore) -> Result<()> {
    if let Some(e) = store.last_persist_error().await {
        bail!("cart updated in memory but not saved: {e}");
    }
    Ok(())
}

fn print_cart(cart: &Cart, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_cart(cart));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_cart(cart)?);
        }
    }
    Ok(())
}

/// Runs the show command.
pub async fn show(cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    print_cart(&store.products().await, cli)
}

/// Runs the add command.
pub async fn add(args: &AddArgs, cli: &Cli) -> Result<()> {
    let product = args.to_product();
    product.validate()?;

    let store = open_store(cli).await?;
    info!(id = %product.id, "Adding product");
    store.add_to_cart(product).await;
    ensure_persisted(&store).await?;

    print_cart(&store.products().await, cli)
}

/// Runs the inc command.
pub async fn increment(id: &str, cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    if store.get(id).await.is_none() && !cli.quiet {
        eprintln!("No line with id {id} in the cart");
    }
    store.increment(id).await;
    ensure_persisted(&store).await?;

    print_cart(&store.products().await, cli)
}

/// Runs the dec command.
pub async fn decrement(id: &str, cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    if store.get(id).await.is_none() && !cli.quiet {
        eprintln!("No line with id {id} in the cart");
    }
    store.decrement(id).await;
    ensure_persisted(&store).await?;

    print_cart(&store.products().await, cli)
}

/// Runs the clear command.
///
/// The saved cart is not loaded first, so clearing also works when the
/// saved record is unreadable.
pub async fn clear(cli: &Cli) -> Result<()> {
    let store = connect_store(cli).await?;
    store.clear().await;
    ensure_persisted(&store).await?;

    print_cart(&store.products().await, cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gomarket_store::CART_STORAGE_KEY;
    use std::ffi::OsStr;
    use std::path::Path;

    fn cli_for(dir: &Path, command: &str) -> Cli {
        let config = dir.join("config.json");
        let storage = dir.join("storage");
        Cli::parse_from([
            OsStr::new("gomarket"),
            OsStr::new("--quiet"),
            OsStr::new("--config"),
            config.as_os_str(),
            OsStr::new("--storage-dir"),
            storage.as_os_str(),
            OsStr::new(command),
        ])
    }

    #[tokio::test]
    async fn test_clear_removes_unreadable_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cli = cli_for(temp_dir.path(), "clear");
        let record = FileStorage::new(temp_dir.path().join("storage"))
            .path_for(CART_STORAGE_KEY)
            .unwrap();
        std::fs::create_dir_all(record.parent().unwrap()).unwrap();
        std::fs::write(&record, "{oops").unwrap();

        assert!(show(&cli).await.is_err());

        clear(&cli).await.unwrap();

        assert!(!record.exists());
        assert!(show(&cli).await.is_ok());
    }

    #[test]
    fn test_add_args_to_product() {
        let args = AddArgs {
            id: "1".to_string(),
            title: "A".to_string(),
            image_url: "u".to_string(),
            price: 10.0,
        };
        assert_eq!(args.to_product(), Product::new("1", "A", "u", 10.0));
    }
}
