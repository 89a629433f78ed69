//! Cart state store.
//!
//! Holds the cart in memory, hydrates it once from key-value storage and
//! writes a fresh snapshot after every mutation. In-memory state is
//! authoritative: storage failures are logged, retried and recorded, but
//! never undo a mutation.

use gomarket_core::{Cart, CartChange, CartItem, CartSnapshot, ItemOrdering, Product};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StorageError, StoreError};
use crate::storage::KeyValueStorage;

// ============================================================================
// Hydration Outcome
// ============================================================================

/// What happened when the store tried to load its persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrationOutcome {
    /// A snapshot was loaded into memory.
    Loaded {
        /// Key the snapshot was read from.
        key: String,
        /// Number of lines loaded.
        items: usize,
    },
    /// No snapshot was stored; the cart stays empty.
    Empty,
    /// A mutation landed before the snapshot was read, so the snapshot was
    /// discarded.
    Superseded,
    /// Hydration already ran (or is running) for this store.
    AlreadyStarted,
    /// Storage could not be read or the snapshot could not be decoded.
    Failed(String),
}

// ============================================================================
// Inner State
// ============================================================================

/// Internal state for the cart store.
#[derive(Default)]
struct CartStoreInner {
    /// Current cart.
    cart: Cart,
    /// Bumped on every applied change.
    version: u64,
    /// Whether a persisted snapshot has been loaded.
    hydrated: bool,
    /// Last storage failure, cleared by the next successful write.
    last_error: Option<String>,
}

/// A write to perform after a mutation.
enum PersistOp {
    Write(CartSnapshot),
    Remove,
}

// ============================================================================
// Cart Store
// ============================================================================

/// Shared cart state with persistence.
///
/// Cloning is cheap and every clone sees the same cart, so a store can be
/// handed to as many consumers as needed.
///
/// ```ignore
/// let storage = Arc::new(FileStorage::open(config.storage_dir()).await?);
/// let store = CartStore::with_config(storage, config);
/// store.spawn_hydrate();
///
/// store.add_to_cart(Product::new("1", "Coffee", "https://img/1.png", 10.0)).await;
/// let cart = store.products().await;
/// ```
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<RwLock<CartStoreInner>>,
    storage: Arc<dyn KeyValueStorage>,
    config: Arc<StoreConfig>,
    notify: Arc<watch::Sender<u64>>,
    /// Version of the last snapshot written; serializes storage writes.
    persisted: Arc<Mutex<u64>>,
    hydration_started: Arc<AtomicBool>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.config.storage_key)
            .field("ordering", &self.config.ordering)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates an empty store with the default configuration.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    /// Creates an empty store with a specific configuration.
    pub fn with_config(storage: Arc<dyn KeyValueStorage>, config: StoreConfig) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(CartStoreInner::default())),
            storage,
            config: Arc::new(config),
            notify: Arc::new(notify),
            persisted: Arc::new(Mutex::new(0)),
            hydration_started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ========================================================================
    // Hydration
    // ========================================================================

    /// Starts hydration in the background and returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_hydrate(&self) -> JoinHandle<HydrationOutcome> {
        let store = self.clone();
        tokio::spawn(async move { store.hydrate().await })
    }

    /// Loads the persisted snapshot into memory.
    ///
    /// Runs at most once per store. Keys are tried in order (primary key,
    /// then legacy read keys); the first record found wins. A snapshot read
    /// from a legacy key or in the nested shape is rewritten under the
    /// primary key in the normal shape.
    pub async fn hydrate(&self) -> HydrationOutcome {
        if self.hydration_started.swap(true, Ordering::SeqCst) {
            debug!("Hydration already started");
            return HydrationOutcome::AlreadyStarted;
        }

        let start_version = self.inner.read().await.version;

        let (key, raw) = match self.read_snapshot().await {
            Ok(Some(found)) => found,
            Ok(None) => {
                debug!(key = %self.config.storage_key, "No persisted cart");
                self.inner.write().await.hydrated = true;
                return HydrationOutcome::Empty;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart");
                self.set_error(e.to_string()).await;
                return HydrationOutcome::Failed(e.to_string());
            }
        };

        let snapshot = match CartSnapshot::from_json(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(key = %key, error = %e, "Persisted cart is not a valid snapshot");
                self.set_error(e.to_string()).await;
                return HydrationOutcome::Failed(e.to_string());
            }
        };

        let needs_migration = key != self.config.storage_key
            || (snapshot.is_nested() && !self.config.legacy_nested_snapshot);

        let (items, version, migrate) = {
            let mut inner = self.inner.write().await;
            if inner.version != start_version {
                warn!(key = %key, "Cart changed before hydration finished, discarding snapshot");
                inner.hydrated = true;
                return HydrationOutcome::Superseded;
            }
            inner.cart = snapshot.into_cart();
            inner.version += 1;
            inner.hydrated = true;
            let migrate = needs_migration.then(|| CartSnapshot::flat(&inner.cart));
            (inner.cart.len(), inner.version, migrate)
        };
        self.notify.send_replace(version);
        info!(key = %key, items, "Cart hydrated");

        if let Some(snapshot) = migrate {
            info!(from = %key, to = %self.config.storage_key, "Migrating persisted cart");
            self.persist(PersistOp::Write(snapshot), version).await;
        }

        HydrationOutcome::Loaded { key, items }
    }

    /// Returns the first stored record among the read keys.
    async fn read_snapshot(&self) -> Result<Option<(String, String)>, StorageError> {
        for key in self.config.read_keys() {
            if let Some(raw) = self.storage.get_item(key).await? {
                return Ok(Some((key.to_string(), raw)));
            }
        }
        Ok(None)
    }

    /// Returns true once a hydration attempt has settled the cart contents.
    pub async fn is_hydrated(&self) -> bool {
        self.inner.read().await.hydrated
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns a copy of the current cart.
    pub async fn products(&self) -> Cart {
        self.inner.read().await.cart.clone()
    }

    /// Returns the line for a product id.
    pub async fn get(&self, id: &str) -> Option<CartItem> {
        self.inner.read().await.cart.get(id).cloned()
    }

    /// Returns the last storage failure, if the most recent write failed.
    pub async fn last_persist_error(&self) -> Option<String> {
        self.inner.read().await.last_error.clone()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds one unit of a product to the cart and persists the cart.
    ///
    /// Products that fail validation (blank id, negative or non-finite
    /// price) are ignored.
    pub async fn add_to_cart(&self, product: Product) {
        self.apply("add_to_cart", move |cart, ordering| cart.add(product, ordering))
            .await;
    }

    /// Adds one unit to an existing line. Unknown ids are ignored.
    pub async fn increment(&self, id: &str) {
        self.apply("increment", |cart, ordering| cart.increment(id, ordering))
            .await;
    }

    /// Removes one unit from an existing line, dropping it at zero.
    /// Unknown ids are ignored.
    pub async fn decrement(&self, id: &str) {
        self.apply("decrement", |cart, ordering| cart.decrement(id, ordering))
            .await;
    }

    /// Empties the cart and removes the persisted record, including any
    /// copy under a legacy key.
    ///
    /// Does not need a prior hydration, so it also discards a record that
    /// cannot be decoded.
    pub async fn clear(&self) {
        let version = {
            let mut inner = self.inner.write().await;
            inner.cart.clear();
            inner.version += 1;
            inner.version
        };
        self.notify.send_replace(version);
        info!("Cart cleared");
        self.persist(PersistOp::Remove, version).await;
    }

    /// Applies a mutation under the lock, then persists the result.
    async fn apply<F>(&self, op: &'static str, mutate: F) -> CartChange
    where
        F: FnOnce(&mut Cart, ItemOrdering) -> CartChange,
    {
        let (change, snapshot, version) = {
            let mut inner = self.inner.write().await;
            let change = mutate(&mut inner.cart, self.config.ordering);
            if !change.is_changed() {
                debug!(op, "Cart unchanged");
                return change;
            }
            inner.version += 1;
            let snapshot = match change {
                CartChange::Removed { .. } if self.config.legacy_nested_snapshot => {
                    CartSnapshot::nested(&inner.cart)
                }
                _ => CartSnapshot::flat(&inner.cart),
            };
            (change, snapshot, inner.version)
        };

        self.notify.send_replace(version);
        debug!(op, id = ?change.id(), version, "Cart updated");

        self.persist(PersistOp::Write(snapshot), version).await;
        change
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Writes (or removes) the snapshot for `version`.
    ///
    /// Writes are serialized; a snapshot older than the last one written is
    /// dropped so storage never moves backwards.
    async fn persist(&self, op: PersistOp, version: u64) {
        let mut persisted = self.persisted.lock().await;
        if *persisted >= version {
            debug!(version, persisted = *persisted, "Skipping stale snapshot");
            return;
        }

        let result = match op {
            PersistOp::Write(snapshot) => match snapshot.to_json() {
                Ok(json) => self.write_with_retry(&json).await,
                Err(e) => Err(StoreError::from(e)),
            },
            PersistOp::Remove => self.remove_records().await,
        };

        // The outcome is recorded before releasing the write gate so a newer
        // write always reports last.
        match result {
            Ok(()) => {
                *persisted = version;
                self.inner.write().await.last_error = None;
                debug!(version, "Cart persisted");
            }
            Err(e) => {
                warn!(version, error = %e, "Failed to persist cart, keeping in-memory state");
                self.set_error(e.to_string()).await;
            }
        }
        drop(persisted);
    }

    /// Removes the record under every read key so a legacy snapshot cannot
    /// resurface on the next hydration.
    async fn remove_records(&self) -> Result<(), StoreError> {
        for key in self.config.read_keys() {
            self.storage.remove_item(key).await?;
        }
        Ok(())
    }

    async fn write_with_retry(&self, json: &str) -> Result<(), StoreError> {
        let retry = &self.config.retry;
        let mut attempt = 1;
        loop {
            match self.storage.set_item(&self.config.storage_key, json).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && retry.allows_another(attempt) => {
                    let delay = retry.delay_for_attempt(attempt);
                    warn!(attempt, delay = ?delay, error = %e, "Cart write failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn set_error(&self, error: String) {
        self.inner.write().await.last_error = Some(error);
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Subscribes to cart changes. The value is a version counter that goes
    /// up on every applied mutation and on hydration.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
