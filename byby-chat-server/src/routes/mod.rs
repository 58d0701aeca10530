//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - `GET/POST /register`, `GET/POST /login`, `GET /logout`
//! - `GET /` redirect to the chat page
//! - `GET/POST /chat`, `GET /chat-history`, `GET /admin` behind the session gate
//! - `GET /health` heartbeat
//! - a templated 404 page for everything else
//! - per-request trace-ID middleware

mod admin;
mod auth;
mod chat;
mod health;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use byby_core::middleware::trace_middleware;
use minijinja::context;

use crate::error::ServerError;
use crate::middleware::session::require_session;
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: AppState) -> Router {
    let protected = Router::new()
        .merge(chat::protected_router())
        .merge(admin::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(auth::router())
        .merge(chat::public_router())
        .merge(health::router())
        .merge(protected)
        .fallback(not_found)
        .layer(middleware::from_fn(trace_middleware))
        .with_state(state)
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> Result<Response, ServerError> {
    let page = state
        .views
        .render("404.html", context! { path => uri.path() })?;
    Ok((StatusCode::NOT_FOUND, page).into_response())
}
