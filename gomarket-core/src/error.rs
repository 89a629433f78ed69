//! Core error types for GoMarket.

use thiserror::Error;

/// Core error type for cart model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product or cart item failed validation.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
