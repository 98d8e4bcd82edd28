//! Collection API: `GET` and `POST /api/qr-codes`

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::{ApiError, AppState};

/// Body of a collection write. Records are stored as sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRequest {
    pub qr_codes: Vec<Value>,
    #[serde(default)]
    pub security_code: String,
}

/// Return the whole collection
pub async fn list_entries(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Value>>, ApiError> {
    let entries = state.store.list_entries().await?;
    Ok(Json(entries))
}

/// Replace the whole collection
pub async fn replace_all(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReplaceRequest>,
) -> Result<Json<Value>, ApiError> {
    debug!("Replacing collection with {} entries", request.qr_codes.len());

    state
        .store
        .replace_all(&request.qr_codes, &request.security_code)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Any other method on the collection
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
