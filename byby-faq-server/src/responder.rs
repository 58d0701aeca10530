//! The ByBy reply logic.
//!
//! A message is classified in a fixed order: greeting, farewell, then a fuzzy
//! lookup against the stored questions. Storage failures never reach the
//! caller; they are logged and answered with the fallback reply.

use byby_core::similarity::close_matches;
use tracing::{debug, error};

use crate::entities::KnowledgeStore;

/// Minimum similarity ratio for a stored question to count as a match.
pub const MATCH_CUTOFF: f64 = 0.6;

/// What a message is asking for, decided from its lower-cased text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Farewell,
    Question,
}

/// Canned replies and the substrings that trigger them.
#[derive(Debug, Clone)]
pub struct ReplyTable {
    pub greeting_triggers: &'static [&'static str],
    pub farewell_triggers: &'static [&'static str],
    pub greetings: &'static [&'static str],
    pub farewells: &'static [&'static str],
    pub fallback: &'static str,
}

impl Default for ReplyTable {
    fn default() -> Self {
        Self {
            greeting_triggers: &["xin chào", "hello", "hi", "chào"],
            farewell_triggers: &["tạm biệt", "bye", "goodbye"],
            greetings: &["Xin chào! Tôi là ByBy PC AI", "Chào bạn!", "Hello!"],
            farewells: &["Tạm biệt!", "Hẹn gặp lại bạn!"],
            fallback: "Xin lỗi, tôi chưa hiểu yêu cầu của bạn",
        }
    }
}

impl ReplyTable {
    /// Substring test, so "hi" also fires inside longer words such as "this".
    pub fn classify(&self, lowered: &str) -> Intent {
        if self.greeting_triggers.iter().any(|t| lowered.contains(t)) {
            Intent::Greeting
        } else if self.farewell_triggers.iter().any(|t| lowered.contains(t)) {
            Intent::Farewell
        } else {
            Intent::Question
        }
    }

    /// Always the first greeting; the alternatives are never chosen.
    pub fn greeting(&self) -> &'static str {
        self.greetings.first().copied().unwrap_or(self.fallback)
    }

    /// Always the first farewell; the alternatives are never chosen.
    pub fn farewell(&self) -> &'static str {
        self.farewells.first().copied().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Responder {
    replies: ReplyTable,
}

impl Responder {
    pub fn new(replies: ReplyTable) -> Self {
        Self { replies }
    }

    /// Reply to `message`. Never fails.
    pub async fn respond<S: KnowledgeStore>(&self, store: &S, message: &str) -> String {
        let lowered = message.to_lowercase();

        match self.replies.classify(&lowered) {
            Intent::Greeting => return self.replies.greeting().to_owned(),
            Intent::Farewell => return self.replies.farewell().to_owned(),
            Intent::Question => {}
        }

        match lookup(store, &lowered).await {
            Ok(Some(answer)) => answer,
            Ok(None) => self.replies.fallback.to_owned(),
            Err(e) => {
                error!(error = %e, "knowledge lookup failed");
                self.replies.fallback.to_owned()
            }
        }
    }
}

/// Closest stored question to `lowered`, then its answer.
async fn lookup<S: KnowledgeStore>(store: &S, lowered: &str) -> Result<Option<String>, sqlx::Error> {
    let questions = store.list_questions().await?;
    let best = close_matches(lowered, questions.iter().map(String::as_str), 1, MATCH_CUTOFF);
    let Some(question) = best.first() else {
        debug!(candidates = questions.len(), "no stored question close enough");
        return Ok(None);
    };
    debug!(matched = %question, "fuzzy match");
    store.find_answer(question).await
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    use crate::entities::{seed_knowledge, AnyStore, SeedMode, DEFAULT_KNOWLEDGE};
    use byby_core::db::DatabaseSettings;

    /// Store whose every call fails, counting how often it is touched.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl KnowledgeStore for BrokenStore {
        async fn list_questions(&self) -> Result<Vec<String>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }
        async fn find_answer(&self, _question: &str) -> Result<Option<String>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }
        async fn count_question(&self, _question: &str) -> Result<i64, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }
        async fn insert_entry(&self, _question: &str, _answer: &str) -> Result<(), sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(sqlx::Error::PoolClosed)
        }
    }

    async fn seeded_store() -> AnyStore {
        let store = AnyStore::connect(&DatabaseSettings::in_memory())
            .await
            .expect("in-memory store");
        seed_knowledge(&store, DEFAULT_KNOWLEDGE, SeedMode::IfMissing)
            .await
            .expect("seed");
        store
    }

    #[tokio::test]
    async fn greetings_never_touch_storage() {
        let store = BrokenStore::default();
        let responder = Responder::default();
        for message in ["Xin chào", "HELLO there", "chào bạn", "hi"] {
            assert_eq!(
                responder.respond(&store, message).await,
                "Xin chào! Tôi là ByBy PC AI"
            );
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn farewells_use_first_reply() {
        let store = BrokenStore::default();
        let reply = Responder::default().respond(&store, "Goodbye!").await;
        assert_eq!(reply, "Tạm biệt!");
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn greeting_wins_over_farewell() {
        let table = ReplyTable::default();
        assert_eq!(table.classify("hello and goodbye"), Intent::Greeting);
        // substring semantics: "this" contains "hi"
        assert_eq!(table.classify("this"), Intent::Greeting);
        assert_eq!(table.classify("cách reset máy tính"), Intent::Question);
    }

    #[tokio::test]
    async fn fuzzy_match_returns_stored_answer() {
        let store = seeded_store().await;
        let reply = Responder::default().respond(&store, "Cach reset may tinh").await;
        assert_eq!(reply, "Vào Settings > Update & Security > Recovery > Reset this PC");
    }

    #[tokio::test]
    async fn distant_message_gets_fallback() {
        let store = seeded_store().await;
        let reply = Responder::default().respond(&store, "mua laptop ở đâu").await;
        assert_eq!(reply, "Xin lỗi, tôi chưa hiểu yêu cầu của bạn");
    }

    #[tokio::test]
    async fn match_boundary_follows_cutoff() {
        let store = AnyStore::connect(&DatabaseSettings::in_memory())
            .await
            .expect("in-memory store");
        store
            .insert_entry("abcdefghij", "ten letters")
            .await
            .expect("insert");
        let responder = Responder::default();

        // ratio 0.6: accepted
        assert_eq!(responder.respond(&store, "ABCDEFxyzw").await, "ten letters");
        // ratio 0.5: rejected
        assert_eq!(
            responder.respond(&store, "abcdexyzwv").await,
            "Xin lỗi, tôi chưa hiểu yêu cầu của bạn"
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn storage_errors_are_logged_and_swallowed() {
        let store = BrokenStore::default();
        let reply = Responder::default().respond(&store, "cài đặt phần mềm").await;
        assert_eq!(reply, "Xin lỗi, tôi chưa hiểu yêu cầu của bạn");
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert!(logs_contain("knowledge lookup failed"));
    }
}
