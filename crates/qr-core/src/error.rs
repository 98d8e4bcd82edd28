//! Error types for qr-core

use thiserror::Error;

/// Result type alias for QR Docs operations
pub type Result<T> = std::result::Result<T, QrError>;

/// QR Docs error types
#[derive(Error, Debug)]
pub enum QrError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid security code")]
    Unauthorized,

    #[error("Stored collection is corrupt: {0}")]
    CorruptCollection(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Document too large: {size} bytes exceeds the limit of {limit} bytes")]
    DocumentTooLarge { size: usize, limit: usize },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid store URL: {0}")]
    InvalidStoreUrl(String),

    #[error("Failed to render QR code: {0}")]
    Render(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl QrError {
    /// Whether this error came from the key-value store connection
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
