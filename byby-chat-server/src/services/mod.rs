//! Clients for the third-party HTTP services behind the resolver.
//!
//! [`QuestionAnswerer`] and [`WebSearch`] are object-safe so the resolver can
//! hold them as `Arc<dyn ...>` and tests can substitute doubles. None of the
//! clients retries or applies a timeout beyond the reqwest defaults.

pub mod qa;
pub mod search;
pub mod weather;

pub use qa::{HttpQaModel, QuestionAnswerer};
pub use search::{GoogleSearch, WebSearch};
pub use weather::WeatherClient;

use reqwest::Client;
use thiserror::Error;

/// Errors returned by the external service clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request could not be sent or the body could not be read/decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    /// The response did not have the expected shape.
    #[error("unexpected {service} response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
}

/// Shared HTTP client used by every service.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("byby-chat-server/", env!("CARGO_PKG_VERSION")))
        .build()
}
