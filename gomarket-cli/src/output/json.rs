//! JSON output formatting.

use anyhow::Result;
use gomarket_core::{Cart, CartItem};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the whole cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartOutput {
    pub items: Vec<ItemOutput>,
    pub distinct_items: usize,
    pub item_count: u64,
    pub total: f64,
}

/// A single cart line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutput {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

impl From<&CartItem> for ItemOutput {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            price: item.price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

impl From<&Cart> for CartOutput {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(ItemOutput::from).collect(),
            distinct_items: cart.len(),
            item_count: cart.item_count(),
            total: cart.total_price(),
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    /// Formats the cart.
    pub fn format_cart(&self, cart: &Cart) -> Result<String> {
        self.format(&CartOutput::from(cart))
    }
}
