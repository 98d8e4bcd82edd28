//! # qr-client
//!
//! Client side of QR Docs: the collection API over HTTP and the manager
//! that keeps the session's entries and pushes every change back.

pub mod api;
pub mod manager;

pub use api::{CollectionApi, HttpCollectionClient};
pub use manager::QrManager;
