//! Server and client settings
//!
//! Both can be read from an optional JSON file. Command-line flags and
//! environment variables are applied on top by the binaries.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{QrError, Result};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Address to bind
    pub bind: String,
    /// Port to listen on
    pub port: u16,
    /// Key-value store URL (`redis://`, `file://`, `memory://`)
    pub store_url: Option<String>,
    /// The accepted security code
    pub security_code: Option<String>,
    /// Base URL encoded into QR codes (defaults to `http://localhost:{port}`)
    pub public_url: Option<String>,
    /// Request body limit in bytes
    pub max_body_bytes: usize,
    /// Serialized collection limit in bytes
    pub max_blob_bytes: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            store_url: None,
            security_code: None,
            public_url: None,
            max_body_bytes: 10 * 1024 * 1024,
            max_blob_bytes: None,
        }
    }
}

impl ServerSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Get the effective base URL for QR payloads
    pub fn effective_public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    /// Get the store URL, failing if none was configured
    pub fn require_store_url(&self) -> Result<&str> {
        self.store_url
            .as_deref()
            .ok_or_else(|| QrError::InvalidConfig("no store URL configured".to_string()))
    }
}

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL of the server
    pub api_url: String,
    /// Base URL encoded into QR codes, when the server is reached elsewhere
    pub public_url: Option<String>,
    /// Security code used for writes
    pub security_code: Option<String>,
    /// Largest file that may be inlined
    pub max_document_bytes: Option<usize>,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: format!("http://localhost:{}", DEFAULT_PORT),
            public_url: None,
            security_code: None,
            max_document_bytes: Some(5 * 1024 * 1024),
            timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }

    /// Get the base URL for QR payloads, the API URL unless set
    pub fn effective_public_url(&self) -> &str {
        self.public_url.as_deref().unwrap_or(&self.api_url)
    }
}

fn load_json<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!("No settings file at {:?}, using defaults", path);
        return Ok(T::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    debug!("Loaded settings from {:?}", path);
    Ok(settings)
}
