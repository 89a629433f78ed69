// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `GoMarket` Core
//!
//! Core cart types and mutations for the `GoMarket` storefront.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models ([`Product`], [`CartItem`], [`Cart`])
//! - Pure cart mutations returning a [`CartChange`]
//! - The persisted snapshot format ([`CartSnapshot`])
//! - Error types
//!
//! ## Example
//!
//! ```
//! use gomarket_core::{Cart, ItemOrdering, Product};
//!
//! let mut cart = Cart::new();
//! let product = Product::new("1", "Coffee beans", "https://img/1.png", 10.0);
//!
//! cart.add(product.clone(), ItemOrdering::InPlace);
//! cart.add(product, ItemOrdering::InPlace);
//! assert_eq!(cart.get("1").map(|i| i.quantity), Some(2));
//!
//! cart.decrement("1", ItemOrdering::InPlace);
//! cart.decrement("1", ItemOrdering::InPlace);
//! assert!(cart.is_empty());
//! ```

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{Cart, CartChange, CartItem, CartSnapshot, ItemOrdering, Product};
