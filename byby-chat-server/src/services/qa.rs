use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::{QaSettings, Secret};
use crate::services::ServiceError;

pub const DEFAULT_QA_MODEL: &str = "bert-large-uncased-whole-word-masking-finetuned-squad";

/// Start-of-sequence token some extractive models emit when they find no span.
pub const PLACEHOLDER_TOKEN: &str = "[CLS]";

/// The single passage every question is answered against.
pub const QA_CONTEXT: &str = "ByBy PC AI is the support assistant for ByBy PC computers. \
    ByBy PC sells desktop computers, laptops and accessories. \
    Every ByBy PC computer comes with a two-year warranty that covers hardware defects. \
    Support is available by email at support@bybypc.example from Monday to Saturday, 8am to 6pm. \
    To reset a Windows computer, open Settings, then Update & Security, then Recovery, and choose Reset this PC. \
    Software is installed by downloading the installer and running the .exe or .dmg file. \
    Orders usually ship within two business days.";

/// Extracts an answer span for a question from a context passage.
#[async_trait]
pub trait QuestionAnswerer: Send + Sync + std::fmt::Debug {
    async fn extract(&self, question: &str, context: &str) -> Result<String, ServiceError>;
}

/// `true` when an extracted span carries no usable answer.
///
/// The comparison with [`PLACEHOLDER_TOKEN`] is exact after trimming, so a
/// model that wraps the token in other text is not caught.
pub fn is_placeholder(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer == PLACEHOLDER_TOKEN
}

/// Hosted inference endpoint (`POST {endpoint}/models/{model}`).
#[derive(Debug, Clone)]
pub struct HttpQaModel {
    client: Client,
    url: String,
    api_token: Option<Secret>,
}

impl HttpQaModel {
    pub fn new(client: Client, settings: &QaSettings) -> Self {
        Self {
            client,
            url: format!(
                "{}/models/{}",
                settings.endpoint.trim_end_matches('/'),
                settings.model
            ),
            api_token: settings.api_token.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnswerSpan {
    answer: String,
    #[serde(default)]
    score: f64,
}

/// The endpoint answers with one span or a ranked list of spans.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QaResponse {
    One(AnswerSpan),
    Many(Vec<AnswerSpan>),
}

impl QaResponse {
    fn best(self) -> Option<AnswerSpan> {
        match self {
            QaResponse::One(span) => Some(span),
            QaResponse::Many(spans) => spans
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }
}

#[async_trait]
impl QuestionAnswerer for HttpQaModel {
    async fn extract(&self, question: &str, context: &str) -> Result<String, ServiceError> {
        let mut request = self.client.post(&self.url).json(&json!({
            "inputs": { "question": question, "context": context }
        }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                service: "qa model",
                status: status.as_u16(),
            });
        }

        let span = response
            .json::<QaResponse>()
            .await?
            .best()
            .ok_or_else(|| ServiceError::Malformed {
                service: "qa model",
                message: "empty answer list".into(),
            })?;
        debug!(score = span.score, answer_len = span.answer.len(), "qa model answered");
        Ok(span.answer)
    }
}
