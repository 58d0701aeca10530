use chrono::{DateTime, Utc};
use serde::Serialize;

/// A row in the `users` table.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// argon2id PHC string, or lowercase SHA-256 hex for legacy rows.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Values for a registration insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}
