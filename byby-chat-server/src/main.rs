//! byby-chat-server – entry point.
//!
//! Startup order:
//! 1. Load `.env` (if present) and parse configuration from the environment.
//! 2. Initialise structured tracing.
//! 3. Open the database and run pending migrations.
//! 4. Build the FAQ table, fetching the weather entry once.
//! 5. Wire the QA model, web search, auth service, templates and session key.
//! 6. Build the Axum router and serve HTTP with graceful shutdown.

mod auth;
mod config;
mod entities;
mod error;
mod faq;
mod middleware;
mod resolver;
mod routes;
mod services;
mod state;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use byby_core::shutdown::shutdown_signal;
use byby_core::telemetry::init_tracing;
use tracing::{info, warn};

use crate::auth::{AuthService, PasswordScheme};
use crate::config::Config;
use crate::entities::AnyStore;
use crate::faq::{StaticFaq, WEATHER_QUESTION};
use crate::middleware::session::session_key;
use crate::resolver::AnswerResolver;
use crate::services::{GoogleSearch, HttpQaModel, WeatherClient};
use crate::state::AppState;
use crate::views::Views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let dotenv = dotenvy::dotenv();
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    init_tracing(&cfg.log_level, cfg.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "byby-chat-server starting");
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = AnyStore::connect(&cfg.database)
        .await
        .with_context(|| format!("opening database {}", cfg.database.redacted_url()))?;
    info!(database_url = %cfg.database.redacted_url(), "database ready");

    // ── 4. FAQ ─────────────────────────────────────────────────────────────────
    let http = services::http_client().context("building HTTP client")?;

    let faq = match &cfg.faq_file {
        Some(path) => StaticFaq::load(path)
            .with_context(|| format!("loading FAQ file {}", path.display()))?,
        None => StaticFaq::builtin(),
    };
    if faq.is_empty() {
        warn!("FAQ table is empty; every question goes to the QA model");
    }
    let weather = WeatherClient::new(http.clone(), &cfg.weather)
        .current_summary(&cfg.weather.city)
        .await;
    let faq = faq.with_entry(WEATHER_QUESTION, weather);
    info!(entries = faq.len(), "FAQ loaded");

    // ── 5. Services ────────────────────────────────────────────────────────────
    let search = GoogleSearch::new(http.clone(), &cfg.search);
    if !search.is_configured() {
        warn!("BYBY_SEARCH_API_KEY / BYBY_SEARCH_ENGINE_ID not set; web search returns no results");
    }
    let qa = HttpQaModel::new(http, &cfg.qa);
    info!(model = %cfg.qa.model, endpoint = %cfg.qa.endpoint, "QA model configured");

    let scheme = if cfg.legacy_password_hash {
        warn!("BYBY_LEGACY_PASSWORD_HASH set; new passwords use unsalted SHA-256");
        PasswordScheme::LegacySha256
    } else {
        PasswordScheme::Argon2
    };
    let auth = AuthService::new(scheme).with_admin_username(&cfg.admin_username);
    info!(scheme = ?auth.scheme(), "password hashing configured");

    match (&cfg.admin_email, &cfg.admin_password) {
        (Some(email), Some(password)) => {
            let admin = auth
                .ensure_admin(&store, email, password.expose())
                .await
                .context("provisioning the admin account")?;
            info!(user_id = admin.id, username = %admin.username, "admin account ready");
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("set both BYBY_ADMIN_EMAIL and BYBY_ADMIN_PASSWORD to provision the admin account");
        }
        (None, None) => {}
    }

    if cfg.session_secret.is_none() {
        warn!("BYBY_SESSION_SECRET not set; sessions will not survive a restart");
    }
    let cookie_key = session_key(cfg.session_secret.as_ref().map(|s| s.expose()))?;

    let views = Views::new().context("compiling templates")?;

    // ── 6. HTTP server with graceful shutdown ──────────────────────────────────
    let state = AppState {
        config: Arc::new(cfg.clone()),
        store: Arc::new(store),
        auth: Arc::new(auth),
        resolver: Arc::new(AnswerResolver::new(
            Arc::new(faq),
            Arc::new(qa),
            Arc::new(search),
        )),
        views: Arc::new(views),
        cookie_key,
    };

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

    info!("byby-chat-server stopped");
    Ok(())
}
