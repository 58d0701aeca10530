//! Static FAQ answers, looked up by exact question text.
//!
//! The table is built once at startup (built-in entries or a TOML file, plus
//! the live weather entry) and never changes afterwards.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// FAQ key whose answer is fetched from the weather service at startup.
pub const WEATHER_QUESTION: &str = "What's the weather today?";

const BUILTIN_FAQ: &[(&str, &str)] = &[
    (
        "What is ByBy PC AI?",
        "ByBy PC AI is the support assistant for ByBy PC computers.",
    ),
    (
        "How long is the warranty?",
        "Every ByBy PC computer comes with a two-year hardware warranty.",
    ),
    (
        "How do I reset my computer?",
        "Open Settings > Update & Security > Recovery and choose Reset this PC.",
    ),
    (
        "How do I install software?",
        "Download the installer and run the .exe or .dmg file.",
    ),
    (
        "How do I contact support?",
        "Email support@bybypc.example, Monday to Saturday, 8am to 6pm.",
    ),
];

/// Exact-match question lookup.
pub trait FaqLookup: Send + Sync + std::fmt::Debug {
    fn answer(&self, question: &str) -> Option<&str>;
}

#[derive(Debug, Error)]
pub enum FaqError {
    #[error("cannot read FAQ file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid FAQ file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// In-memory FAQ table.
#[derive(Debug, Clone, Default)]
pub struct StaticFaq {
    entries: HashMap<String, String>,
}

/// `[[entry]]` tables with `question` and `answer` keys.
#[derive(Debug, Deserialize)]
struct FaqFile {
    #[serde(default, rename = "entry")]
    entries: Vec<FaqFileEntry>,
}

#[derive(Debug, Deserialize)]
struct FaqFileEntry {
    question: String,
    answer: String,
}

impl StaticFaq {
    pub fn builtin() -> Self {
        BUILTIN_FAQ
            .iter()
            .fold(Self::default(), |faq, (q, a)| faq.with_entry(*q, *a))
    }

    pub fn from_toml(text: &str) -> Result<Self, FaqError> {
        let file: FaqFile = toml::from_str(text)?;
        Ok(file
            .entries
            .into_iter()
            .fold(Self::default(), |faq, e| faq.with_entry(e.question, e.answer)))
    }

    pub fn load(path: &Path) -> Result<Self, FaqError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Add or replace one entry.
    pub fn with_entry(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.entries.insert(question.into(), answer.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FaqLookup for StaticFaq {
    fn answer(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }
}
