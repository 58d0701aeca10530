//! Server configuration, loaded from environment variables at startup.

use byby_core::db::DatabaseSettings;
use byby_core::env::{env_flag, env_opt, env_or};

/// Runtime configuration for byby-faq-server.
///
/// Every field has a default so the server starts without any environment
/// variables set (against a local MySQL `byby_ai` database).
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`).
    pub bind_address: String,

    /// Knowledge database location (`BYBY_DATABASE_URL` or `MYSQL_*`).
    pub database: DatabaseSettings,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Insert the seed rows on every start, even when they already exist.
    /// Off by default; only useful to reproduce the duplicate-row behaviour
    /// of older deployments.
    pub legacy_seed: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("BYBY_BIND", "0.0.0.0:5000"),
            database: DatabaseSettings::from_env(),
            log_level: env_or("BYBY_LOG", "info"),
            log_json: env_flag("BYBY_LOG_JSON"),
            cors_allowed_origins: env_opt("BYBY_CORS_ORIGINS"),
            legacy_seed: env_flag("BYBY_LEGACY_SEED"),
        }
    }
}
