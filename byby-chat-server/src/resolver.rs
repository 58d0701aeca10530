//! Answer resolution: FAQ, then the QA model, then web search.
//!
//! Errors from the QA model or search are returned to the caller unchanged;
//! nothing here retries or substitutes an answer for a failed call.

use std::sync::Arc;

use strum::AsRefStr;
use tracing::{debug, info};

use crate::entities::ChatStore;
use crate::error::ServerError;
use crate::faq::FaqLookup;
use crate::services::qa::{is_placeholder, QA_CONTEXT};
use crate::services::{QuestionAnswerer, ServiceError, WebSearch};

/// Answer given when the search fallback has no results.
pub const NOT_FOUND_ANSWER: &str = "Sorry, I could not find an answer to that question.";

/// Where a resolved answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AnswerSource {
    Faq,
    Model,
    Search,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
}

#[derive(Debug, Clone)]
pub struct AnswerResolver {
    faq: Arc<dyn FaqLookup>,
    qa: Arc<dyn QuestionAnswerer>,
    search: Arc<dyn WebSearch>,
    context: String,
}

impl AnswerResolver {
    pub fn new(
        faq: Arc<dyn FaqLookup>,
        qa: Arc<dyn QuestionAnswerer>,
        search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            faq,
            qa,
            search,
            context: QA_CONTEXT.to_owned(),
        }
    }

    /// Answer `question` without recording it.
    pub async fn answer(&self, question: &str) -> Result<Resolution, ServiceError> {
        if let Some(answer) = self.faq.answer(question) {
            return Ok(Resolution {
                answer: answer.to_owned(),
                source: AnswerSource::Faq,
            });
        }

        let extracted = self.qa.extract(question, &self.context).await?;
        if !is_placeholder(&extracted) {
            return Ok(Resolution {
                answer: extracted,
                source: AnswerSource::Model,
            });
        }
        debug!(extracted = %extracted, "model gave no usable span, searching");

        Ok(match self.search.first_snippet(question).await? {
            Some(snippet) => Resolution {
                answer: snippet,
                source: AnswerSource::Search,
            },
            None => Resolution {
                answer: NOT_FOUND_ANSWER.to_owned(),
                source: AnswerSource::NotFound,
            },
        })
    }

    /// Answer `question` for `user_id` and append exactly one chat-log row.
    /// A failed resolution writes nothing.
    pub async fn resolve<S: ChatStore>(
        &self,
        store: &S,
        user_id: i64,
        question: &str,
    ) -> Result<Resolution, ServerError> {
        let resolution = self.answer(question).await?;
        store
            .append_chat(user_id, &chat_line(question, &resolution.answer))
            .await?;
        info!(user_id, source = resolution.source.as_ref(), "question answered");
        Ok(resolution)
    }
}

/// The stored form of one exchange.
pub fn chat_line(question: &str, answer: &str) -> String {
    format!("Q: {question} A: {answer}")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
