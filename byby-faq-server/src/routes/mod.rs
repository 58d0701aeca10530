//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - `GET /` chat widget page
//! - `POST /chat` JSON chat endpoint
//! - `GET /health` heartbeat
//! - `GET /api-docs/openapi.json` OpenAPI document
//! - middleware layers (CORS, per-request trace-ID injection)

mod chat;
pub mod doc;
mod health;
mod home;

use std::sync::Arc;

use axum::{middleware, Router};
use byby_core::middleware::trace_middleware;

use crate::middleware::cors;
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(home::router())
        .merge(chat::router())
        .merge(health::router())
        .merge(doc::router())
        // Outermost layers execute first on the way in.
        .layer(cors::cors_layer(&state))
        .layer(middleware::from_fn(trace_middleware))
        .with_state(state)
}
