//! File storage backend
//!
//! Stores each key as its own file in a data directory. Writes go through a
//! temp file and a rename so readers never observe a half-written value.

use async_trait::async_trait;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{QrError, Result};

/// File storage backend
pub struct FileStore {
    /// Directory holding one file per key
    storage_dir: PathBuf,
}

impl FileStore {
    /// Create a file store in the default per-user data directory
    pub fn new() -> Result<Self> {
        let storage_dir = Self::default_storage_dir()?;
        Self::with_dir(storage_dir)
    }

    /// Create with a custom storage directory
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir).map_err(|e| {
            QrError::StorageUnavailable(format!(
                "Could not create {}: {}",
                storage_dir.display(),
                e
            ))
        })?;

        debug!("File storage initialized at: {:?}", storage_dir);
        Ok(Self { storage_dir })
    }

    /// Get the default storage directory
    fn default_storage_dir() -> Result<PathBuf> {
        ProjectDirs::from("org", "qr-docs", "qr-docs")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                QrError::StorageUnavailable("Could not determine data directory".to_string())
            })
    }

    /// Get the path of the file holding `key`
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(QrError::StorageUnavailable(format!(
                "Key cannot be used as a file name: {:?}",
                key
            )));
        }
        Ok(self.storage_dir.join(format!("{}.json", key)))
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!("Retrieved key: {}", key);
                Ok(Some(contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Key not found: {}", key);
                Ok(None)
            }
            Err(e) => Err(QrError::StorageUnavailable(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        let temp_path = path.with_extension("tmp");

        let write = async {
            tokio::fs::write(&temp_path, value).await?;
            tokio::fs::rename(&temp_path, &path).await
        };
        write.await.map_err(|e| {
            QrError::StorageUnavailable(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Stored key: {}", key);
        Ok(())
    }

    async fn reset(&self) {}

    fn backend_name(&self) -> &'static str {
        "File"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path().to_path_buf()).unwrap();

        store.set("qrCodes", "[]").await.unwrap();
        assert_eq!(store.get("qrCodes").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_retrieve_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(store.get("qrCodes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = FileStore::with_dir(temp_dir.path().to_path_buf()).unwrap();
            store.set("qrCodes", r#"[{"id":"QR-AAAAAAAAA"}]"#).await.unwrap();
        }

        {
            let store = FileStore::with_dir(temp_dir.path().to_path_buf()).unwrap();
            let value = store.get("qrCodes").await.unwrap();
            assert_eq!(value, Some(r#"[{"id":"QR-AAAAAAAAA"}]"#.to_string()));
        }

        assert!(!temp_dir.path().join("qrCodes.tmp").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path().to_path_buf()).unwrap();

        let result = store.set("../escape", "x").await;
        assert!(matches!(result, Err(QrError::StorageUnavailable(_))));
    }
}
