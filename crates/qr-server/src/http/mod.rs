//! HTTP surface: routes, CORS and shared state

mod api;
mod error;
mod pages;

pub use api::ReplaceRequest;
pub use error::ApiError;

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use qr_core::CollectionStore;

/// Path of the collection API
pub const API_PATH: &str = "/api/qr-codes";

/// Shared state for HTTP handlers
pub struct AppState {
    /// The stored collection
    pub store: CollectionStore,
    /// Base URL encoded into QR codes
    pub public_url: String,
}

/// Build the router with every route and layer
pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(pages::grid))
        .route("/health", get(pages::health))
        .route("/qr.html", get(pages::redirect))
        .route("/print/:id", get(pages::print_view))
        .route(
            API_PATH,
            get(api::list_entries)
                .post(api::replace_all)
                .fallback(api::method_not_allowed),
        )
        .fallback(pages::not_found)
        .layer(middleware::from_fn(answer_options))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Answer every `OPTIONS` request with an empty 200
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}
