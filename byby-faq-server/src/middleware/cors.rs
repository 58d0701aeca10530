use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// CORS for the chat endpoint. The widget only ever POSTs JSON, so methods
/// and headers are limited to that. `BYBY_CORS_ORIGINS` narrows the allowed
/// origins; without it (or when nothing in it parses) any origin is allowed.
pub fn cors_layer(state: &Arc<AppState>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .iter()
        .flat_map(|list| list.split(','))
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
