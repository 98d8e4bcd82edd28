//! Collection store: the whole entry list as one blob under a fixed key
//!
//! Every write replaces the blob. There is no version check and no merge, so
//! two concurrent writers race and the last one wins.
//!
//! Records are kept as raw JSON and returned exactly as stored. Only the
//! typed views ([`CollectionStore::entries`], [`CollectionStore::find`])
//! read them as [`Entry`] values, skipping records that do not fit.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::entry::{parse_records, Entry};
use crate::error::{QrError, Result};
use crate::secret::SecurityCode;
use crate::storage::KeyValueStore;

/// Key holding the serialized collection
pub const COLLECTION_KEY: &str = "qrCodes";

/// Reads and replaces the stored collection
pub struct CollectionStore {
    /// Storage backend
    store: Arc<dyn KeyValueStore>,
    /// The accepted security code
    security_code: SecurityCode,
    /// Upper bound for the serialized collection, if any
    max_blob_bytes: Option<usize>,
}

impl CollectionStore {
    /// Create a collection store over an injected backend
    pub fn new(store: Arc<dyn KeyValueStore>, security_code: SecurityCode) -> Self {
        Self {
            store,
            security_code,
            max_blob_bytes: None,
        }
    }

    /// Reject collections whose serialized form exceeds `limit` bytes
    pub fn with_max_blob_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_blob_bytes = limit;
        self
    }

    /// List every stored record unchanged. A missing key is an empty collection.
    pub async fn list_entries(&self) -> Result<Vec<Value>> {
        let data = self.guard(self.store.get(COLLECTION_KEY)).await?;

        let entries = match data {
            Some(raw) => serde_json::from_str::<Vec<Value>>(&raw).map_err(|e| {
                error!("Stored collection does not parse: {}", e);
                QrError::CorruptCollection(e.to_string())
            })?,
            None => Vec::new(),
        };

        debug!("Listed {} entries", entries.len());
        Ok(entries)
    }

    /// Overwrite the stored collection with `entries`
    pub async fn replace_all(&self, entries: &[Value], secret: &str) -> Result<()> {
        if !self.security_code.verify(secret) {
            warn!("Rejected collection write with invalid security code");
            return Err(QrError::Unauthorized);
        }

        let blob = serde_json::to_string(entries)?;

        if let Some(limit) = self.max_blob_bytes {
            if blob.len() > limit {
                return Err(QrError::DocumentTooLarge {
                    size: blob.len(),
                    limit,
                });
            }
        }

        self.guard(self.store.set(COLLECTION_KEY, &blob)).await?;

        info!("Stored {} entries ({} bytes)", entries.len(), blob.len());
        Ok(())
    }

    /// List the stored records that read as entries
    pub async fn entries(&self) -> Result<Vec<Entry>> {
        Ok(parse_records(&self.list_entries().await?))
    }

    /// Find one entry by id
    pub async fn find(&self, id: &str) -> Result<Entry> {
        self.entries()
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| QrError::EntryNotFound(id.to_string()))
    }

    /// Get the storage backend name
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Run a store call, discarding the connection if it fails
    async fn guard<T>(&self, call: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        match call.await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_storage_failure() {
                    error!("Store call failed, resetting connection: {}", e);
                    self.store.reset().await;
                }
                Err(e)
            }
        }
    }
}
