//! Database abstraction layer.
//!
//! [`KnowledgeStore`] defines the lookups the responder needs. The default
//! implementation is [`AnyStore`], an `sqlx::Any` pool that runs the MySQL or
//! SQLite migration set depending on the connection URL.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.

pub mod knowledge;

pub use knowledge::{seed_knowledge, KnowledgeStore, SeedEntry, SeedMode, DEFAULT_KNOWLEDGE};

use byby_core::db::{open_pool, DatabaseSettings, Dialect};
use sqlx::migrate::Migrator;

#[derive(Clone, Debug)]
pub struct AnyStore {
    pool: sqlx::AnyPool,
}

impl AnyStore {
    /// Open the database described by `settings` and run pending migrations.
    ///
    /// Migration sets are embedded at compile time from `./migrations/<dialect>`.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let dialect = settings.dialect().ok_or_else(|| {
            sqlx::Error::Configuration(
                format!("unsupported database URL scheme: {}", settings.redacted_url()).into(),
            )
        })?;
        let pool = open_pool(settings).await?;
        migrator(dialect).run(&pool).await?;
        Ok(Self { pool })
    }

    /// Round-trip a trivial query; used by the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Embedded migration set for `dialect`. Both servers may share one database,
/// so versions applied by the other server are not treated as missing here.
fn migrator(dialect: Dialect) -> Migrator {
    let mut migrator = match dialect {
        Dialect::MySql => sqlx::migrate!("./migrations/mysql"),
        Dialect::Sqlite => sqlx::migrate!("./migrations/sqlite"),
    };
    migrator.set_ignore_missing(true);
    migrator
}
