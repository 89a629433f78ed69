//! Integration tests for many consumers mutating one cart at once.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use gomarket_core::{CartSnapshot, Product};
use gomarket_store::{CART_STORAGE_KEY, CartProvider, CartStore, KeyValueStorage, MemoryStorage};

fn product(id: usize) -> Product {
    Product::new(id.to_string(), format!("Item {id}"), format!("https://img/{id}"), 1.0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_storage_converges_to_memory_state() {
    let storage = Arc::new(MemoryStorage::new());
    let mut provider = CartProvider::install(CartStore::new(storage.clone())).unwrap();
    provider.hydrated().await;

    let tasks = (0..64).map(|n| {
        let cart = provider.scope().child().use_cart().unwrap();
        tokio::spawn(async move {
            let id = n % 8;
            cart.add_to_cart(product(id)).await;
            if n % 3 == 0 {
                cart.increment(&id.to_string()).await;
            }
            if n % 4 == 0 {
                cart.decrement(&id.to_string()).await;
            }
        })
    });
    for result in join_all(tasks).await {
        result.unwrap();
    }

    let cart = provider.store().products().await;
    let unique: HashSet<&str> = cart.ids().collect();
    assert_eq!(unique.len(), cart.len());
    assert!(cart.items().iter().all(|item| item.quantity > 0));

    let persisted = storage.get_item(CART_STORAGE_KEY).await.unwrap().unwrap();
    assert_eq!(CartSnapshot::from_json(&persisted).unwrap().into_cart(), cart);
}

#[tokio::test]
async fn test_add_to_cart_counts_every_call() {
    let store = CartStore::new(Arc::new(MemoryStorage::new()));

    join_all((0..10).map(|_| store.add_to_cart(product(1)))).await;

    let cart = store.products().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get("1").map(|i| i.quantity), Some(10));
}
