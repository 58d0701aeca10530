use chrono::{DateTime, Utc};
use serde::Serialize;

/// A row in the `chats` table.
#[derive(Debug, Clone, Serialize)]
pub struct ChatLogEntry {
    pub id: i64,
    pub user_id: i64,
    /// `"Q: <question> A: <answer>"`.
    pub message: String,
    pub created_at: DateTime<Utc>,
}
