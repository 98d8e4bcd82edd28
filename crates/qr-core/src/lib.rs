//! # qr-core
//!
//! Core of QR Docs:
//! - Entry model and id generation
//! - Key-value store backends (Redis, files, memory)
//! - The collection store guarded by a shared security code
//! - Document inlining and QR/HTML rendering

pub mod collection;
pub mod document;
pub mod entry;
pub mod error;
pub mod render;
pub mod secret;
pub mod settings;
pub mod storage;

pub use collection::{CollectionStore, COLLECTION_KEY};
pub use document::{DataUri, DocumentSource, URL_DOCUMENT_TYPE};
pub use entry::{generate_id, is_valid_id, Entry};
pub use error::{QrError, Result};
pub use render::Card;
pub use secret::SecurityCode;
pub use settings::{ClientSettings, ServerSettings};
pub use storage::{FileStore, KeyValueStore, MemoryStore, RedisStore};
