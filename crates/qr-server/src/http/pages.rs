//! HTML pages: card grid, print view and the redirect behind every code

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{ApiError, AppState};
use qr_core::document::validate_url;
use qr_core::render::{self, escape_html, page, print};
use qr_core::{Card, DataUri, QrError, Result};

/// Inlined documents run with no script and no access to this origin
const DOCUMENT_CSP: &str = "sandbox";

/// Query of the redirect page
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub id: Option<String>,
}

fn message_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>QR Docs</title></head>\n<body><p>{}</p></body>\n</html>\n",
        escape_html(message)
    );
    (status, Html(body)).into_response()
}

/// `GET /` - every entry as a card
pub async fn grid(State(state): State<Arc<AppState>>) -> std::result::Result<Html<String>, ApiError> {
    let entries = state.store.entries().await?;

    let cards = entries
        .iter()
        .map(|entry| Card::from_entry(entry, &state.public_url))
        .collect::<Result<Vec<_>>>()?;

    Ok(Html(page::grid(&cards)?))
}

/// `GET /print/:id` - standalone print view
pub async fn print_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Response, ApiError> {
    match state.store.find(&id).await {
        Ok(entry) => Ok(Html(print::view(&entry, &state.public_url)?).into_response()),
        Err(QrError::EntryNotFound(_)) => Ok(message_page(StatusCode::NOT_FOUND, "QR code not found")),
        Err(e) => Err(e.into()),
    }
}

/// `GET /qr.html?id=` - send the scanner to the entry's document
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RedirectQuery>,
) -> std::result::Result<Response, ApiError> {
    let Some(id) = query.id.filter(|id| !id.is_empty()) else {
        return Ok(message_page(StatusCode::BAD_REQUEST, "Missing QR code id"));
    };

    let entry = match state.store.find(&id).await {
        Ok(entry) => entry,
        Err(QrError::EntryNotFound(_)) => {
            return Ok(message_page(StatusCode::NOT_FOUND, "QR code not found"));
        }
        Err(e) => return Err(e.into()),
    };

    let Some(document) = entry.document_url.as_deref().filter(|url| !url.is_empty()) else {
        return Ok(message_page(StatusCode::NOT_FOUND, render::card::NO_DOCUMENT));
    };

    if DataUri::is_data_uri(document) {
        return Ok(match DataUri::parse(document) {
            Ok(data) => {
                debug!("Serving inlined document for {} ({})", id, data.mime);
                (
                    [(header::CONTENT_TYPE, data.mime)],
                    [
                        (header::CONTENT_SECURITY_POLICY, DOCUMENT_CSP),
                        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
                    ],
                    data.bytes,
                )
                    .into_response()
            }
            Err(e) => {
                warn!("Entry {} has an unreadable document: {}", id, e);
                message_page(StatusCode::UNPROCESSABLE_ENTITY, "Document cannot be opened")
            }
        });
    }

    match validate_url(document) {
        Ok(url) => {
            debug!("Redirecting {} to {}", id, url);
            Ok(Redirect::temporary(url.as_str()).into_response())
        }
        Err(e) => {
            warn!("Entry {} links an invalid URL: {}", id, e);
            Ok(message_page(StatusCode::UNPROCESSABLE_ENTITY, "Document link is invalid"))
        }
    }
}

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}

/// Unknown paths
pub async fn not_found() -> Response {
    message_page(StatusCode::NOT_FOUND, "Not found")
}
