//! Key-value store backends
//!
//! The collection lives under a single key, so a backend only has to get and
//! set strings:
//! 1. Redis (`redis://`, `rediss://`)
//! 2. Files on disk (`file:///path/to/dir`, or `file:` for the user data dir)
//! 3. Process memory (`memory://`)

mod file;
mod memory;
mod redis_store;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::{ReconnectPolicy, RedisStore};
pub use traits::KeyValueStore;

use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::error::{QrError, Result};

/// Open the backend named by `store_url`
pub fn open(store_url: &str) -> Result<Arc<dyn KeyValueStore>> {
    let parsed =
        Url::parse(store_url).map_err(|e| QrError::InvalidStoreUrl(format!("{}: {}", store_url, e)))?;

    let store: Arc<dyn KeyValueStore> = match parsed.scheme() {
        "redis" | "rediss" => Arc::new(RedisStore::new(store_url)?),
        "file" => {
            let path = parsed.path();
            if path.is_empty() || path == "/" {
                Arc::new(FileStore::new()?)
            } else {
                let dir = parsed.to_file_path().map_err(|_| {
                    QrError::InvalidStoreUrl(format!("{}: not a local path", store_url))
                })?;
                Arc::new(FileStore::with_dir(dir)?)
            }
        }
        "memory" => Arc::new(MemoryStore::new()),
        other => {
            return Err(QrError::InvalidStoreUrl(format!(
                "unsupported scheme {:?}",
                other
            )))
        }
    };

    info!("Using {} store", store.backend_name());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_memory() {
        let store = open("memory://").unwrap();
        assert_eq!(store.backend_name(), "Memory");
    }

    #[test]
    fn test_open_redis_does_not_connect() {
        let store = open("redis://127.0.0.1:1/").unwrap();
        assert_eq!(store.backend_name(), "Redis");
    }

    #[test]
    fn test_open_file_dir() {
        let temp_dir = TempDir::new().unwrap();
        let url = Url::from_directory_path(temp_dir.path()).unwrap();
        let store = open(url.as_str()).unwrap();
        assert_eq!(store.backend_name(), "File");
    }

    #[test]
    fn test_open_unknown_scheme() {
        assert!(matches!(
            open("postgres://localhost/db"),
            Err(QrError::InvalidStoreUrl(_))
        ));
        assert!(matches!(open("no scheme"), Err(QrError::InvalidStoreUrl(_))));
    }
}
