//! Domain models for the cart.
//!
//! ## Submodules
//!
//! - [`product`] - Product descriptors and cart line items
//! - [`cart`] - The cart collection and its mutations
//! - [`snapshot`] - The persisted JSON snapshot format

mod cart;
mod product;
mod snapshot;

pub use cart::{Cart, CartChange, ItemOrdering};
pub use product::{CartItem, Product};
pub use snapshot::CartSnapshot;

#[cfg(test)]
mod serde_tests;
