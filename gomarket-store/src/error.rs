//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart API was requested from a scope with no cart installed.
    #[error("{0} must be used within a CartProvider")]
    OutsideProvider(&'static str),

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cart model error.
    #[error("Cart error: {0}")]
    Core(#[from] gomarket_core::CoreError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Storage(e) => e.is_transient(),
            StoreError::Io(_) => true,
            _ => false,
        }
    }
}

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be stored by this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// IO error while reading or writing a record.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns true if retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Io(_) | StorageError::Backend(_))
    }
}
