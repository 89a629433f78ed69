//! Serde serialization/deserialization tests for cart types.
//!
//! The persisted cart is read back by older app releases, so field names
//! and shapes are pinned here.

use serde_json::json;

use crate::{Cart, CartItem, CartSnapshot, ItemOrdering, Product};

// ============================================================================
// CartItem
// ============================================================================

#[test]
fn test_cart_item_field_names() {
    let item = Product::new("1", "A", "u", 10.0).into_item(2);
    let value = serde_json::to_value(&item).unwrap();

    assert_eq!(
        value,
        json!({"id": "1", "title": "A", "image_url": "u", "price": 10.0, "quantity": 2})
    );
}

#[test]
fn test_cart_item_accepts_integer_price() {
    let item: CartItem = serde_json::from_value(
        json!({"id": "1", "title": "A", "image_url": "u", "price": 10, "quantity": 1}),
    )
    .unwrap();
    assert!((item.price - 10.0).abs() < f64::EPSILON);
}

#[test]
fn test_cart_item_rejects_negative_quantity() {
    let result: Result<CartItem, _> = serde_json::from_value(
        json!({"id": "1", "title": "A", "image_url": "u", "price": 1, "quantity": -1}),
    );
    assert!(result.is_err());
}

#[test]
fn test_product_has_no_quantity() {
    let value = serde_json::to_value(Product::new("1", "A", "u", 1.5)).unwrap();
    assert!(value.get("quantity").is_none());
}

// ============================================================================
// ItemOrdering
// ============================================================================

#[test]
fn test_item_ordering_snake_case() {
    assert_eq!(
        serde_json::to_string(&ItemOrdering::MoveToEnd).unwrap(),
        r#""move_to_end""#
    );
    let parsed: ItemOrdering = serde_json::from_str(r#""in_place""#).unwrap();
    assert_eq!(parsed, ItemOrdering::InPlace);
}

// ============================================================================
// Cart
// ============================================================================

#[test]
fn test_cart_serializes_as_plain_array() {
    let mut cart = Cart::new();
    cart.add(Product::new("1", "A", "u", 10.0), ItemOrdering::InPlace);

    let value = serde_json::to_value(&cart).unwrap();
    assert!(value.is_array());
    assert_eq!(value.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_cart_deserialize_repairs_duplicates() {
    let cart: Cart = serde_json::from_value(json!([
        {"id": "1", "title": "A", "image_url": "u", "price": 1, "quantity": 1},
        {"id": "1", "title": "A", "image_url": "u", "price": 1, "quantity": 2},
        {"id": "2", "title": "B", "image_url": "u", "price": 1, "quantity": 0}
    ]))
    .unwrap();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get("1").map(|i| i.quantity), Some(3));
}

#[test]
fn test_flat_snapshot_matches_cart_encoding() {
    let mut cart = Cart::new();
    cart.add(Product::new("1", "A", "u", 10.0), ItemOrdering::InPlace);
    cart.add(Product::new("2", "B", "v", 3.0), ItemOrdering::InPlace);

    let via_snapshot = CartSnapshot::flat(&cart).to_json().unwrap();
    let via_cart = serde_json::to_string(&cart).unwrap();
    assert_eq!(via_snapshot, via_cart);
}
