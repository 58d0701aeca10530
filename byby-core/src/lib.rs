//! byby-core – plumbing shared by the ByBy servers.
//!
//! Nothing in here knows about FAQs, users or chats. Each server owns its
//! own configuration, schema and handlers and only borrows the helpers below:
//!
//! - [`env`]: typed environment-variable lookups with defaults.
//! - [`telemetry`]: `tracing` subscriber initialisation.
//! - [`middleware`]: per-request trace-ID middleware.
//! - [`db`]: database settings and `sqlx::Any` pool opening.
//! - [`shutdown`]: SIGINT / SIGTERM future for graceful shutdown.
//! - [`similarity`]: Ratcliff/Obershelp similarity ratio and closest-match selection.

pub mod db;
pub mod env;
pub mod middleware;
pub mod shutdown;
pub mod similarity;
pub mod telemetry;
