//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::entities::AnyStore;
use crate::responder::Responder;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Knowledge table access.
    pub store: Arc<AnyStore>,
    /// Greeting / farewell / fuzzy-match reply logic.
    pub responder: Arc<Responder>,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::entities::{seed_knowledge, SeedMode, DEFAULT_KNOWLEDGE};
    use byby_core::db::DatabaseSettings;

    /// State over a seeded in-memory SQLite database.
    pub async fn seeded_state() -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".into(),
            database: DatabaseSettings::in_memory(),
            log_level: "debug".into(),
            log_json: false,
            cors_allowed_origins: None,
            legacy_seed: false,
        };
        let store = AnyStore::connect(&config.database)
            .await
            .expect("in-memory store");
        seed_knowledge(&store, DEFAULT_KNOWLEDGE, SeedMode::IfMissing)
            .await
            .expect("seed");
        Arc::new(AppState {
            config: Arc::new(config),
            store: Arc::new(store),
            responder: Arc::new(Responder::default()),
        })
    }
}
