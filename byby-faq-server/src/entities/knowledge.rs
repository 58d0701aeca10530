use std::future::Future;

use chrono::Utc;
use tracing::debug;

use crate::entities::AnyStore;

/// A question/answer pair inserted at startup.
#[derive(Debug, Clone, Copy)]
pub struct SeedEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Rows every deployment starts with.
pub const DEFAULT_KNOWLEDGE: &[SeedEntry] = &[
    SeedEntry {
        question: "cách reset máy tính",
        answer: "Vào Settings > Update & Security > Recovery > Reset this PC",
    },
    SeedEntry {
        question: "cài đặt phần mềm",
        answer: "Tải file cài đặt và chạy file .exe hoặc .dmg",
    },
];

/// How [`seed_knowledge`] treats rows that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Insert a seed row only when no row with the same question exists.
    IfMissing,
    /// Insert every seed row on every call; restarts accumulate duplicates.
    AlwaysInsert,
}

pub trait KnowledgeStore: Send + Sync + 'static {
    /// Every stored question, in insertion order.
    fn list_questions(&self) -> impl Future<Output = Result<Vec<String>, sqlx::Error>> + Send;

    /// Answer of the first row whose question equals `question` exactly.
    fn find_answer(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<Option<String>, sqlx::Error>> + Send;

    fn count_question(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;

    fn insert_entry(
        &self,
        question: &str,
        answer: &str,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

impl KnowledgeStore for AnyStore {
    async fn list_questions(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT question FROM knowledge ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(q,)| q).collect())
    }

    async fn find_answer(&self, question: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT answer FROM knowledge WHERE question = ? ORDER BY id LIMIT 1",
        )
        .bind(question)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(a,)| a))
    }

    async fn count_question(&self, question: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM knowledge WHERE question = ?")
            .bind(question)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_entry(&self, question: &str, answer: &str) -> Result<(), sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO knowledge (question, answer, created_at) VALUES (?, ?, ?)")
            .bind(question)
            .bind(answer)
            .bind(&created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Insert `entries` according to `mode`. Returns the number of rows written.
///
/// Seeding happens before the listener is bound, so the check-then-insert in
/// [`SeedMode::IfMissing`] never races with request handlers.
pub async fn seed_knowledge<S: KnowledgeStore>(
    store: &S,
    entries: &[SeedEntry],
    mode: SeedMode,
) -> Result<usize, sqlx::Error> {
    let mut inserted = 0;
    for entry in entries {
        if mode == SeedMode::IfMissing && store.count_question(entry.question).await? > 0 {
            debug!(question = entry.question, "seed row already present");
            continue;
        }
        store.insert_entry(entry.question, entry.answer).await?;
        inserted += 1;
    }
    Ok(inserted)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use byby_core::db::DatabaseSettings;

    async fn store() -> AnyStore {
        AnyStore::connect(&DatabaseSettings::in_memory())
            .await
            .expect("in-memory store")
    }

    #[tokio::test]
    async fn seeding_if_missing_is_idempotent() {
        let store = store().await;
        let first = seed_knowledge(&store, DEFAULT_KNOWLEDGE, SeedMode::IfMissing)
            .await
            .expect("seed");
        let second = seed_knowledge(&store, DEFAULT_KNOWLEDGE, SeedMode::IfMissing)
            .await
            .expect("reseed");

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(store.list_questions().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn legacy_seeding_duplicates_rows() {
        let store = store().await;
        for _ in 0..2 {
            seed_knowledge(&store, DEFAULT_KNOWLEDGE, SeedMode::AlwaysInsert)
                .await
                .expect("seed");
        }
        assert_eq!(
            store.count_question("cách reset máy tính").await.expect("count"),
            2
        );
        assert_eq!(store.list_questions().await.expect("list").len(), 4);
    }

    #[tokio::test]
    async fn find_answer_is_exact() {
        let store = store().await;
        seed_knowledge(&store, DEFAULT_KNOWLEDGE, SeedMode::IfMissing)
            .await
            .expect("seed");

        assert_eq!(
            store.find_answer("cài đặt phần mềm").await.expect("lookup").as_deref(),
            Some("Tải file cài đặt và chạy file .exe hoặc .dmg")
        );
        assert_eq!(store.find_answer("cài đặt").await.expect("lookup"), None);
    }
}
