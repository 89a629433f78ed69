//! Product and cart item types.
//!
//! - [`Product`] - What a screen hands to `add_to_cart` (no quantity yet)
//! - [`CartItem`] - A product held in the cart with its quantity

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Product
// ============================================================================

/// A product descriptor as shown in the catalog.
///
/// This is a [`CartItem`] without a quantity. Adding it to a cart either
/// creates a line with quantity 1 or bumps the existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Creates a new product descriptor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Turns this product into a cart line with the given quantity.
    pub fn into_item(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }

    /// Validates the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidData` if the id is blank or the price is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidData("product id is empty".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CoreError::InvalidData(format!(
                "price for {} must be a non-negative number, got {}",
                self.id, self.price
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Cart Item
// ============================================================================

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique product identifier (unique within a cart).
    pub id: String,
    /// Display title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Number of units in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Returns price × quantity for display.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_item_sets_quantity() {
        let item = Product::new("1", "A", "u", 10.0).into_item(3);
        assert_eq!(item.quantity, 3);
        assert_eq!(item.id, "1");
        assert!((item.line_total() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let product = Product::new("  ", "A", "u", 1.0);
        assert!(matches!(product.validate(), Err(CoreError::InvalidData(_))));
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        assert!(Product::new("1", "A", "u", -1.0).validate().is_err());
        assert!(Product::new("1", "A", "u", f64::NAN).validate().is_err());
        assert!(Product::new("1", "A", "u", 0.0).validate().is_ok());
    }
}
