//! byby-faq-server – entry point.
//!
//! Startup order:
//! 1. Load `.env` (if present) and parse configuration from the environment.
//! 2. Initialise structured tracing (JSON when `BYBY_LOG_JSON` is set).
//! 3. Open the knowledge database and run pending migrations.
//! 4. Seed the knowledge table.
//! 5. Build the Axum router and serve HTTP with graceful shutdown.

mod config;
mod entities;
mod error;
mod middleware;
mod responder;
mod routes;
mod schemas;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use byby_core::shutdown::shutdown_signal;
use byby_core::telemetry::init_tracing;
use tracing::info;

use crate::config::Config;
use crate::entities::{seed_knowledge, AnyStore, SeedMode, DEFAULT_KNOWLEDGE};
use crate::responder::{ReplyTable, Responder};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let dotenv = dotenvy::dotenv();
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    init_tracing(&cfg.log_level, cfg.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "byby-faq-server starting");
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = AnyStore::connect(&cfg.database)
        .await
        .with_context(|| format!("opening database {}", cfg.database.redacted_url()))?;
    info!(database_url = %cfg.database.redacted_url(), "database ready");

    // ── 4. Seed data ───────────────────────────────────────────────────────────
    let mode = if cfg.legacy_seed {
        SeedMode::AlwaysInsert
    } else {
        SeedMode::IfMissing
    };
    let inserted = seed_knowledge(&store, DEFAULT_KNOWLEDGE, mode)
        .await
        .context("seeding knowledge table")?;
    info!(inserted, ?mode, "knowledge table seeded");

    // ── 5. HTTP server with graceful shutdown ──────────────────────────────────
    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        store: Arc::new(store),
        responder: Arc::new(Responder::new(ReplyTable::default())),
    });

    let app = routes::build(state);
    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("invalid BYBY_BIND address '{}'", cfg.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("byby-faq-server stopped");
    Ok(())
}
