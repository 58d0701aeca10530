use std::future::Future;

use chrono::Utc;

use crate::entities::{parse_timestamp, AnyStore, ChatLogEntry};

pub trait ChatStore: Send + Sync + 'static {
    /// Append one log row for `user_id`. Returns the new row id.
    fn append_chat(
        &self,
        user_id: i64,
        message: &str,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    /// The user's rows, oldest first.
    fn list_chats_for_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<ChatLogEntry>, sqlx::Error>> + Send;

    /// Every row, oldest first.
    fn list_all_chats(&self) -> impl Future<Output = Result<Vec<ChatLogEntry>, sqlx::Error>> + Send;
}

type ChatRow = (i64, i64, String, String);

fn from_row((id, user_id, message, created_at): ChatRow) -> ChatLogEntry {
    ChatLogEntry {
        id,
        user_id,
        message,
        created_at: parse_timestamp(&created_at),
    }
}

impl ChatStore for AnyStore {
    async fn append_chat(&self, user_id: i64, message: &str) -> Result<i64, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();
        let result =
            sqlx::query("INSERT INTO chats (user_id, message, created_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(message)
                .bind(&created_at)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_id().unwrap_or_default())
    }

    async fn list_chats_for_user(&self, user_id: i64) -> Result<Vec<ChatLogEntry>, sqlx::Error> {
        let rows: Vec<ChatRow> = sqlx::query_as(
            "SELECT id, user_id, message, created_at FROM chats WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn list_all_chats(&self) -> Result<Vec<ChatLogEntry>, sqlx::Error> {
        let rows: Vec<ChatRow> =
            sqlx::query_as("SELECT id, user_id, message, created_at FROM chats ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(from_row).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::{NewUser, UserStore};
    use byby_core::db::DatabaseSettings;

    #[tokio::test]
    async fn history_is_per_user() {
        let store = AnyStore::connect(&DatabaseSettings::in_memory())
            .await
            .expect("in-memory store");
        let mut ids = Vec::new();
        for name in ["an", "binh"] {
            let user = store
                .insert_user(NewUser {
                    email: format!("{name}@example.com"),
                    username: name.into(),
                    password_hash: "hash".into(),
                })
                .await
                .expect("insert user");
            ids.push(user.id);
        }

        store.append_chat(ids[0], "Q: one A: 1").await.expect("append");
        store.append_chat(ids[1], "Q: two A: 2").await.expect("append");
        store.append_chat(ids[0], "Q: three A: 3").await.expect("append");

        let mine: Vec<String> = store
            .list_chats_for_user(ids[0])
            .await
            .expect("history")
            .into_iter()
            .map(|c| c.message)
            .collect();
        assert_eq!(mine, ["Q: one A: 1", "Q: three A: 3"]);
        assert_eq!(store.list_all_chats().await.expect("all").len(), 3);
    }
}
