//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`. Details are logged; the client
//! only sees a short generic HTML page with the matching status code.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::services::ServiceError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// The QA model or the search API failed.
    #[error("upstream service error: {0}")]
    Upstream(#[from] ServiceError),

    /// Password hashing or verification failed.
    #[error("authentication backend error: {0}")]
    Auth(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Auth outcomes that reach this conversion are backend failures; the
/// user-facing ones are turned into notices by the route handlers.
impl From<AuthError> for ServerError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Database(e) => ServerError::Database(e),
            AuthError::Password(e) => ServerError::Auth(e.to_string()),
            AuthError::Task(e) => ServerError::Auth(e.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), error = %self, "request failed");
        let message = match self {
            ServerError::Upstream(_) => "The answer service is unavailable right now.",
            _ => "Something went wrong on our side.",
        };
        let body = format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"><title>Error</title></head>\
             <body><h1>{}</h1><p>{message}</p><p><a href=\"/chat\">Back to chat</a></p></body></html>",
            status.as_u16()
        );
        (status, Html(body)).into_response()
    }
}
