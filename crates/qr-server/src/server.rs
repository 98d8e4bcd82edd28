//! Server orchestration

use std::sync::Arc;
use tracing::info;

use crate::http::{self, AppState};
use qr_core::{storage, CollectionStore, QrError, Result, SecurityCode, ServerSettings};

/// QR Docs HTTP server
pub struct QrServer {
    settings: ServerSettings,
}

impl QrServer {
    /// Create a server from resolved settings
    pub fn new(settings: ServerSettings) -> Self {
        Self { settings }
    }

    /// Open the store and build the shared state
    pub fn state(&self) -> Result<Arc<AppState>> {
        let security_code = self
            .settings
            .security_code
            .clone()
            .ok_or_else(|| QrError::InvalidConfig("no security code configured".to_string()))?;

        let backend = storage::open(self.settings.require_store_url()?)?;
        let store = CollectionStore::new(backend, SecurityCode::new(security_code)?)
            .with_max_blob_bytes(self.settings.max_blob_bytes);

        Ok(Arc::new(AppState {
            store,
            public_url: self.settings.effective_public_url(),
        }))
    }

    /// Run the server until it fails
    pub async fn run(&self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let state = self.state()?;
        info!(
            "Collection stored in {} backend, codes point at {}",
            state.store.backend_name(),
            state.public_url
        );

        let app = http::router(state, self.settings.max_body_bytes);

        let addr = format!("{}:{}", self.settings.bind, self.settings.port);
        info!("Starting QR Docs server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
