//! OpenAPI document for the JSON API.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use super::chat::ChatApi;
use super::health::HealthApi;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(info(title = "byby-faq-server", description = "ByBy PC AI FAQ chatbot"))]
pub struct ApiDoc;

/// Merged document of every documented route group.
pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(ChatApi::openapi());
    doc.merge(HealthApi::openapi());
    doc
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(get_docs())
}
