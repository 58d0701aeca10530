//! Health / heartbeat endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(get_health))
}

/// `200 {"status":"ok"}` when the database answers, `503` otherwise.
/// External services are not checked.
pub async fn get_health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") })),
        ),
        Err(e) => {
            warn!(error = %e, "health check: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "version": env!("CARGO_PKG_VERSION") })),
            )
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::routes::build;
    use crate::routes::testing::{get, send};
    use crate::state::testing::test_state;

    #[tokio::test]
    async fn health_is_public_and_ok() {
        let app = build(test_state().await);
        let page = send(&app, get("/health", None)).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains("\"status\":\"ok\""));
    }
}
