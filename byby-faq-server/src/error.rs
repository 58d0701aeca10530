//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`; the error renders as a JSON body
//! `{"error": "..."}` with an appropriate status code.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body was not the expected JSON document.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),

    /// The caller sent a well-formed but unacceptable request.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidJson(rejection) => (rejection.status(), rejection.body_text()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
        };
        warn!(status = status.as_u16(), error = %self, "request rejected");
        (status, Json(json!({ "error": message }))).into_response()
    }
}
