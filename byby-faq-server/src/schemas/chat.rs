use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Free-text message typed by the user.
    pub message: String,
}

/// Response body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    /// The bot's reply.
    pub response: String,
}
