//! Database settings and `sqlx::Any` pool opening.
//!
//! Both servers talk to MySQL in production and to SQLite in tests through the
//! same `Any` pool, so every query in the workspace is written with plain `?`
//! placeholders and stores timestamps as RFC 3339 text.

use std::str::FromStr;

use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::AnyPool;

use crate::env::{env_opt, env_or, parse_env};

/// SQL dialect behind a connection URL. Selects the migration set to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            Some(Self::MySql)
        } else if url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }
}

/// Where the database lives and how many connections to keep open.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// sqlx connection URL (`mysql://…` or `sqlite:…`).
    pub url: String,
    /// Upper bound of the connection pool.
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// `BYBY_DATABASE_URL` wins; otherwise the URL is assembled from
    /// `MYSQL_HOST`, `MYSQL_USER`, `MYSQL_PASSWORD` and `MYSQL_DB`.
    pub fn from_env() -> Self {
        let url = env_opt("BYBY_DATABASE_URL").unwrap_or_else(|| {
            mysql_url(
                &env_or("MYSQL_HOST", "localhost"),
                &env_or("MYSQL_USER", "root"),
                &env_or("MYSQL_PASSWORD", ""),
                &env_or("MYSQL_DB", "byby_ai"),
            )
        });
        Self {
            url,
            max_connections: parse_env("BYBY_DB_MAX_CONNECTIONS", 5),
        }
    }

    /// Private in-memory SQLite database. One connection, so every query sees
    /// the same database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
        }
    }

    pub fn dialect(&self) -> Option<Dialect> {
        Dialect::from_url(&self.url)
    }

    /// Connection URL with the password masked, safe to log.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let credentials = &self.url[scheme_end + 3..at];
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{}{}:***{}", &self.url[..scheme_end + 3], user, &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }
}

/// Build a MySQL URL, percent-encoding the credentials.
pub fn mysql_url(host: &str, user: &str, password: &str, database: &str) -> String {
    let user = urlencoding::encode(user);
    if password.is_empty() {
        format!("mysql://{user}@{host}/{database}")
    } else {
        let password = urlencoding::encode(password);
        format!("mysql://{user}:{password}@{host}/{database}")
    }
}

/// Open an `Any` pool for `settings`. Migrations are run by the caller.
pub async fn open_pool(settings: &DatabaseSettings) -> Result<AnyPool, sqlx::Error> {
    sqlx::any::install_default_drivers();
    let options = AnyConnectOptions::from_str(&settings.url)?;
    AnyPoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .connect_with(options)
        .await
}

/// `true` when `err` is a UNIQUE-constraint violation reported by the driver.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
