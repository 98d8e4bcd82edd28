//! # qr-server
//!
//! HTTP server for QR Docs: the collection API, the page behind every
//! printed code, print views and a card grid.

pub mod http;
mod server;

pub use http::{router, ApiError, AppState, API_PATH};
pub use server::QrServer;
