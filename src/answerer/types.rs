//! Types for answer fetching results.

use serde::Serialize;
use thiserror::Error;

use crate::gemini::TransportError;

/// Failures that can occur while fetching an answer.
///
/// Every call to `fetch_answer` resolves to exactly one `Result`; none of
/// these variants escape as panics. The variants are distinguishable so the
/// caller can choose appropriate user-facing messaging.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The question was empty or whitespace-only. No request was issued.
    #[error("question is empty")]
    EmptyInput,

    /// Transport-level failure: no response was received. Terminal, not retried.
    #[error("network error: {0}")]
    Network(#[source] TransportError),

    /// Non-2xx HTTP status other than 429. Terminal, not retried.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The service returned 429 on every attempt and retries are exhausted.
    #[error("rate limited after all retry attempts")]
    RateLimited,

    /// A successful response carried no usable answer text. Terminal.
    #[error("response contained no generated content")]
    EmptyGeneration,

    /// Defensive fallback; the retry loop exited without resolving.
    #[error("unknown failure")]
    Unknown,
}

/// A web source cited by the generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Link to the cited page.
    pub uri: String,
    /// Human-readable page title.
    pub title: String,
}

impl Source {
    /// Creates a new source citation.
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: title.into(),
        }
    }
}

/// A successfully generated answer with optional web citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// The generated answer text
    text: String,
    /// Citations to web sources, in response order
    sources: Vec<Source>,
}

impl Answer {
    /// Creates a new answer.
    pub fn new(text: String, sources: Vec<Source>) -> Self {
        Self { text, sources }
    }

    /// Returns the answer text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the cited web sources.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Returns true if the answer carries at least one citation.
    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}
