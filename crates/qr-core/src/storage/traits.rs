//! Storage trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Trait for key-value store backends
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting whatever was there
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Drop any open connection; the next call reconnects
    async fn reset(&self);

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
