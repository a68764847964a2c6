//! Key-value store port
//!
//! The conversation store only needs string keys and string values with
//! full-overwrite semantics. Backends live in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a key-value backend or while (de)serializing a record
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value; `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, replacing any previous one
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
