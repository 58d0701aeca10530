use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::{SearchSettings, Secret};
use crate::services::ServiceError;

/// General-purpose web search.
#[async_trait]
pub trait WebSearch: Send + Sync + std::fmt::Debug {
    /// Snippet of the first result for `query`, if there is any result.
    async fn first_snippet(&self, query: &str) -> Result<Option<String>, ServiceError>;
}

#[derive(Debug, Clone)]
struct Credentials {
    api_key: Secret,
    engine_id: String,
}

/// Google Custom Search JSON API client.
#[derive(Debug, Clone)]
pub struct GoogleSearch {
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
}

impl GoogleSearch {
    pub fn new(client: Client, settings: &SearchSettings) -> Self {
        let credentials = match (&settings.api_key, &settings.engine_id) {
            (Some(api_key), Some(engine_id)) => Some(Credentials {
                api_key: api_key.clone(),
                engine_id: engine_id.clone(),
            }),
            _ => None,
        };
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    snippet: Option<String>,
}

impl SearchResponse {
    fn first_snippet(self) -> Option<String> {
        self.items.into_iter().next().and_then(|item| item.snippet)
    }
}

#[async_trait]
impl WebSearch for GoogleSearch {
    async fn first_snippet(&self, query: &str) -> Result<Option<String>, ServiceError> {
        let Some(credentials) = &self.credentials else {
            debug!("web search not configured, returning no results");
            return Ok(None);
        };

        let url = Url::parse_with_params(
            &self.endpoint,
            [
                ("key", credentials.api_key.expose()),
                ("cx", credentials.engine_id.as_str()),
                ("q", query),
            ],
        )
        .map_err(|e| ServiceError::Malformed {
            service: "web search",
            message: format!("invalid endpoint: {e}"),
        })?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                service: "web search",
                status: status.as_u16(),
            });
        }

        let results: SearchResponse = response.json().await?;
        debug!(items = results.items.len(), "web search answered");
        Ok(results.first_snippet())
    }
}
