//! The cart collection and its mutations.
//!
//! All mutations are pure in-memory operations that report what happened
//! through a [`CartChange`], so callers can decide whether (and how) to
//! persist the result.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::product::{CartItem, Product};

// ============================================================================
// Ordering Policy
// ============================================================================

/// Where an existing line ends up when its quantity changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrdering {
    /// Update the line where it is; cart order is insertion order.
    #[default]
    InPlace,
    /// Remove the line and re-append it at the end, so recently touched
    /// lines sort last. Matches carts written by earlier app releases.
    MoveToEnd,
}

impl std::fmt::Display for ItemOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemOrdering::InPlace => write!(f, "in-place"),
            ItemOrdering::MoveToEnd => write!(f, "move-to-end"),
        }
    }
}

// ============================================================================
// Cart Change
// ============================================================================

/// Outcome of a single cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with quantity 1.
    Added {
        /// Product id.
        id: String,
    },
    /// An existing line went up by one.
    Incremented {
        /// Product id.
        id: String,
        /// Quantity after the change.
        quantity: u32,
    },
    /// An existing line went down by one and is still in the cart.
    Decremented {
        /// Product id.
        id: String,
        /// Quantity after the change.
        quantity: u32,
    },
    /// A line reached quantity 0 and was removed.
    Removed {
        /// Product id.
        id: String,
    },
    /// The id was not in the cart; nothing changed.
    Unchanged,
}

impl CartChange {
    /// Returns true if the cart was modified.
    pub fn is_changed(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }

    /// Returns the affected product id, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            CartChange::Added { id }
            | CartChange::Incremented { id, .. }
            | CartChange::Decremented { id, .. }
            | CartChange::Removed { id } => Some(id),
            CartChange::Unchanged => None,
        }
    }
}

// ============================================================================
// Cart
// ============================================================================

/// An ordered collection of cart lines keyed by product id.
///
/// Ids are unique and every line has a quantity of at least 1. Carts are
/// small, so lookups are linear scans over a `Vec`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from raw lines, repairing anything that breaks the
    /// cart invariants.
    ///
    /// Zero-quantity lines are dropped. Duplicate ids are merged into the
    /// first occurrence with their quantities summed.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                debug!(id = %item.id, "Dropping zero-quantity cart item");
                continue;
            }
            if let Some(existing) = cart.items.iter_mut().find(|i| i.id == item.id) {
                warn!(id = %item.id, "Merging duplicate cart item");
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the lines in cart order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the cart, returning its lines.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Returns the line for a product id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns true if the product is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity across all lines, for display.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Iterates product ids in cart order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds one unit of a product.
    ///
    /// A new id is appended with quantity 1; an existing id is bumped.
    /// A product that fails [`Product::validate`] is rejected and the cart
    /// is left unchanged.
    pub fn add(&mut self, product: Product, ordering: ItemOrdering) -> CartChange {
        if let Err(e) = product.validate() {
            warn!(id = %product.id, error = %e, "Rejecting invalid product");
            return CartChange::Unchanged;
        }
        match self.position(&product.id) {
            Some(index) => {
                let quantity = self.bump(index, ordering);
                CartChange::Incremented {
                    id: product.id,
                    quantity,
                }
            }
            None => {
                let id = product.id.clone();
                self.items.push(product.into_item(1));
                CartChange::Added { id }
            }
        }
    }

    /// Adds one unit to an existing line. Unknown ids are ignored.
    pub fn increment(&mut self, id: &str, ordering: ItemOrdering) -> CartChange {
        let Some(index) = self.position(id) else {
            trace!(id = %id, "Increment for unknown id ignored");
            return CartChange::Unchanged;
        };
        let quantity = self.bump(index, ordering);
        CartChange::Incremented {
            id: id.to_string(),
            quantity,
        }
    }

    /// Removes one unit from an existing line, dropping the line when it
    /// reaches zero. Unknown ids are ignored.
    pub fn decrement(&mut self, id: &str, ordering: ItemOrdering) -> CartChange {
        let Some(index) = self.position(id) else {
            trace!(id = %id, "Decrement for unknown id ignored");
            return CartChange::Unchanged;
        };

        let quantity = self.items[index].quantity.saturating_sub(1);
        if quantity == 0 {
            self.items.remove(index);
            return CartChange::Removed { id: id.to_string() };
        }

        match ordering {
            ItemOrdering::InPlace => self.items[index].quantity = quantity,
            ItemOrdering::MoveToEnd => {
                let mut item = self.items.remove(index);
                item.quantity = quantity;
                self.items.push(item);
            }
        }
        CartChange::Decremented {
            id: id.to_string(),
            quantity,
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Adds one unit to the line at `index` and returns the new quantity.
    fn bump(&mut self, index: usize, ordering: ItemOrdering) -> u32 {
        match ordering {
            ItemOrdering::InPlace => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            ItemOrdering::MoveToEnd => {
                let mut item = self.items.remove(index);
                item.quantity = item.quantity.saturating_add(1);
                let quantity = item.quantity;
                self.items.push(item);
                quantity
            }
        }
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product::new(id, format!("Product {id}"), format!("https://img/{id}.png"), 10.0)
    }

    fn ids(cart: &Cart) -> Vec<&str> {
        cart.ids().collect()
    }

    #[test]
    fn test_add_new_id_appends_with_quantity_one() {
        let mut cart = Cart::new();
        let change = cart.add(product("1"), ItemOrdering::InPlace);

        assert_eq!(change, CartChange::Added { id: "1".to_string() });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_add_rejects_invalid_product() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::InPlace);

        let infinite = Product::new("2", "B", "u", f64::INFINITY);
        assert_eq!(cart.add(infinite, ItemOrdering::InPlace), CartChange::Unchanged);
        let blank = Product::new("", "C", "u", 1.0);
        assert_eq!(cart.add(blank, ItemOrdering::InPlace), CartChange::Unchanged);

        assert_eq!(ids(&cart), vec!["1"]);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_add_existing_id_bumps_quantity() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::InPlace);
        cart.add(product("2"), ItemOrdering::InPlace);

        let change = cart.add(product("1"), ItemOrdering::InPlace);

        assert_eq!(
            change,
            CartChange::Incremented {
                id: "1".to_string(),
                quantity: 2
            }
        );
        assert_eq!(cart.len(), 2);
        assert_eq!(ids(&cart), vec!["1", "2"]);
    }

    #[test]
    fn test_move_to_end_reorders_touched_line() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::MoveToEnd);
        cart.add(product("2"), ItemOrdering::MoveToEnd);
        cart.add(product("3"), ItemOrdering::MoveToEnd);

        cart.add(product("1"), ItemOrdering::MoveToEnd);
        assert_eq!(ids(&cart), vec!["2", "3", "1"]);

        cart.increment("2", ItemOrdering::MoveToEnd);
        assert_eq!(ids(&cart), vec!["3", "1", "2"]);

        cart.decrement("3", ItemOrdering::MoveToEnd);
        assert_eq!(ids(&cart), vec!["1", "2"]);

        cart.decrement("1", ItemOrdering::MoveToEnd);
        assert_eq!(ids(&cart), vec!["2", "1"]);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_in_place_keeps_order() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::InPlace);
        cart.add(product("2"), ItemOrdering::InPlace);
        cart.increment("1", ItemOrdering::InPlace);
        cart.increment("1", ItemOrdering::InPlace);
        cart.decrement("1", ItemOrdering::InPlace);

        assert_eq!(ids(&cart), vec!["1", "2"]);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::InPlace);
        let before = cart.clone();

        assert_eq!(cart.increment("nope", ItemOrdering::InPlace), CartChange::Unchanged);
        assert_eq!(cart.decrement("nope", ItemOrdering::InPlace), CartChange::Unchanged);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::InPlace);

        let change = cart.decrement("1", ItemOrdering::InPlace);

        assert_eq!(change, CartChange::Removed { id: "1".to_string() });
        assert!(cart.is_empty());
        assert!(!cart.contains("1"));
    }

    #[test]
    fn test_from_items_repairs_invariants() {
        let items = vec![
            product("1").into_item(2),
            product("2").into_item(0),
            product("1").into_item(3),
            product("3").into_item(1),
        ];

        let cart = Cart::from_items(items);

        assert_eq!(ids(&cart), vec!["1", "3"]);
        assert_eq!(cart.get("1").map(|i| i.quantity), Some(5));
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(Product::new("1", "A", "u", 2.5), ItemOrdering::InPlace);
        cart.add(Product::new("1", "A", "u", 2.5), ItemOrdering::InPlace);
        cart.add(Product::new("2", "B", "u", 4.0), ItemOrdering::InPlace);

        assert_eq!(cart.item_count(), 3);
        assert!((cart.total_price() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_change_accessors() {
        assert!(!CartChange::Unchanged.is_changed());
        assert_eq!(CartChange::Unchanged.id(), None);

        let removed = CartChange::Removed { id: "9".to_string() };
        assert!(removed.is_changed());
        assert_eq!(removed.id(), Some("9"));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(product("1"), ItemOrdering::InPlace);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }
}
