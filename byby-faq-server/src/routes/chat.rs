//! JSON chat endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::chat::{ChatRequest, ChatResponse};
use crate::state::AppState;

/// Longest accepted message. The widget sends one line of text; anything
/// far larger is not a chat message.
const MAX_MESSAGE_BYTES: usize = 4 * 1024;

#[derive(OpenApi)]
#[openapi(paths(chat), components(schemas(ChatRequest, ChatResponse)))]
pub struct ChatApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

/// Answer one chat message (`POST /chat`).
///
/// Always answers with a reply string; when nothing matches (or the
/// knowledge table is unreachable) the reply is the fallback sentence.
#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Bot reply", body = ChatResponse),
        (status = 400, description = "Message too large or malformed body"),
        (status = 422, description = "Body is JSON but lacks `message`"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(req) = body?;

    if req.message.len() > MAX_MESSAGE_BYTES {
        return Err(ServerError::BadRequest(format!(
            "message too large ({} bytes); maximum is {} bytes",
            req.message.len(),
            MAX_MESSAGE_BYTES,
        )));
    }

    let response = state.responder.respond(state.store.as_ref(), &req.message).await;
    debug!(message_len = req.message.len(), response_len = response.len(), "chat answered");
    Ok(Json(ChatResponse { response }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
