// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GoMarket` Store
//!
//! Cart state management for the `GoMarket` storefront.
//!
//! This crate provides:
//!
//! - **CartStore**: The in-memory cart with hydration, persistence after
//!   every mutation and watch-channel change notifications
//! - **CartProvider / CartScope**: Installing a store for part of the app and
//!   handing it to consumers
//! - **KeyValueStorage**: The storage seam, with file and memory backends
//! - **StoreConfig**: Storage key, ordering and retry settings
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gomarket_core::Product;
//! use gomarket_store::{CartProvider, CartStore, FileStorage, StoreConfig};
//!
//! let config = StoreConfig::load().await?;
//! let storage = Arc::new(FileStorage::open(config.storage_dir()).await?);
//! let provider = CartProvider::install(CartStore::with_config(storage, config))?;
//!
//! // Somewhere below the provider
//! let cart = provider.scope().use_cart()?;
//! cart.add_to_cart(Product::new("1", "Coffee", "https://img/1.png", 10.0)).await;
//!
//! // Subscribe to changes
//! let mut rx = cart.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Cart updated!");
//! }
//! ```

pub mod cart_store;
pub mod config;
pub mod error;
pub mod persistence;
pub mod provider;
pub mod retry;
pub mod storage;

pub use cart_store::{CartStore, HydrationOutcome};
pub use config::{CART_STORAGE_KEY, LEGACY_CART_STORAGE_KEY, StoreConfig};
pub use error::{StorageError, StoreError};
pub use persistence::{
    default_config_dir, default_config_path, default_data_dir, default_storage_dir, load_json,
    save_json,
};
pub use provider::{CartProvider, CartScope, use_cart};
pub use retry::PersistRetry;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
