//! Persisted snapshot format.
//!
//! A snapshot is the whole cart written as a JSON array of [`CartItem`].
//! Some releases of the mobile app wrote the remaining lines wrapped in an
//! extra array (`[[...]]`) after a line was decremented to zero. Both shapes
//! decode; the nested one is only written when explicitly asked for.

use serde::{Deserialize, Serialize};

use super::cart::Cart;
use super::product::CartItem;
use crate::error::CoreError;

/// A serialized cart as stored under the cart key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CartSnapshot {
    /// `[item, item, ...]`
    Flat(Vec<CartItem>),
    /// `[[item, item, ...], ...]`, the legacy zero-quantity write.
    Nested(Vec<Vec<CartItem>>),
}

impl CartSnapshot {
    /// Snapshot of a cart in the normal flat shape.
    pub fn flat(cart: &Cart) -> Self {
        CartSnapshot::Flat(cart.items().to_vec())
    }

    /// Snapshot of a cart wrapped in one extra array layer.
    pub fn nested(cart: &Cart) -> Self {
        CartSnapshot::Nested(vec![cart.items().to_vec()])
    }

    /// Returns true for the legacy nested shape.
    pub fn is_nested(&self) -> bool {
        matches!(self, CartSnapshot::Nested(_))
    }

    /// Flattens the snapshot into a cart, repairing duplicate ids and
    /// zero quantities along the way.
    pub fn into_cart(self) -> Cart {
        match self {
            CartSnapshot::Flat(items) => Cart::from_items(items),
            CartSnapshot::Nested(groups) => {
                Cart::from_items(groups.into_iter().flatten().collect())
            }
        }
    }

    /// Encodes the snapshot as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialization` if the text is neither a flat nor
    /// a nested array of cart items. The error is the one from decoding the
    /// flat shape, which points at the offending position.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let flat_err = match serde_json::from_str::<Vec<CartItem>>(json) {
            Ok(items) => return Ok(CartSnapshot::Flat(items)),
            Err(e) => e,
        };
        match serde_json::from_str::<Vec<Vec<CartItem>>>(json) {
            Ok(groups) => Ok(CartSnapshot::Nested(groups)),
            Err(_) => Err(flat_err.into()),
        }
    }
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        CartSnapshot::flat(cart)
    }
}
