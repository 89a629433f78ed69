//! Cart provider and consumer scopes.
//!
//! A [`CartProvider`] installs a [`CartStore`] for part of the application
//! and starts hydrating it. Consumers receive a [`CartScope`] and call
//! [`CartScope::use_cart`]; asking a scope that has no provider above it is a
//! configuration error, not something to recover from at runtime.
//!
//! Code that already holds a `CartStore` can skip scopes entirely and pass
//! the store directly.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cart_store::{CartStore, HydrationOutcome};
use crate::error::StoreError;

/// Name reported when the cart is requested outside a provider.
const USE_CART: &str = "use_cart";

// ============================================================================
// Provider
// ============================================================================

/// Installs a cart store and owns its background hydration.
#[derive(Debug)]
pub struct CartProvider {
    store: CartStore,
    hydration: Option<JoinHandle<HydrationOutcome>>,
}

impl CartProvider {
    /// Installs `store` and starts hydrating it in the background.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` when called outside a tokio runtime.
    pub fn install(store: CartStore) -> Result<Self, StoreError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| StoreError::Config(format!("CartProvider needs an async runtime: {e}")))?;

        let task = store.clone();
        let hydration = handle.spawn(async move { task.hydrate().await });
        debug!(store = ?store, "Cart provider installed");

        Ok(Self {
            store,
            hydration: Some(hydration),
        })
    }

    /// Returns the root scope for everything under this provider.
    pub fn scope(&self) -> CartScope {
        CartScope {
            store: Some(self.store.clone()),
        }
    }

    /// Returns the installed store.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Waits for background hydration to finish.
    ///
    /// Returns `None` if it was already awaited or the task did not complete.
    pub async fn hydrated(&mut self) -> Option<HydrationOutcome> {
        let handle = self.hydration.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "Cart hydration task failed");
                None
            }
        }
    }
}

// ============================================================================
// Scope
// ============================================================================

/// A handle to the part of the application a consumer lives in.
///
/// Child scopes inherit the cart of their parent. A default scope has no
/// cart installed.
#[derive(Debug, Clone, Default)]
pub struct CartScope {
    store: Option<CartStore>,
}

impl CartScope {
    /// A scope with no provider above it.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Creates a child scope that sees the same cart.
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// Returns true if a cart is reachable from this scope.
    pub fn has_cart(&self) -> bool {
        self.store.is_some()
    }

    /// Returns the cart store installed above this scope.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OutsideProvider` if no provider is installed.
    pub fn use_cart(&self) -> Result<CartStore, StoreError> {
        self.store.clone().ok_or(StoreError::OutsideProvider(USE_CART))
    }
}

/// Returns the cart store reachable from `scope`.
///
/// # Errors
///
/// Returns `StoreError::OutsideProvider` if no provider is installed.
pub fn use_cart(scope: &CartScope) -> Result<CartStore, StoreError> {
    scope.use_cart()
}

// ============================================================================
// Tests
// ============================================================================
