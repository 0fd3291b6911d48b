//! Resilient answer fetching over the generative-language API.

use std::sync::Arc;

use serde_json::Value;

use crate::gemini::AnswerTransport;

use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use super::types::{Answer, FetchError, Source};

/// Fixed persona instruction grounding the model's responses in the product
/// domain. Static configuration; never derived from user input.
const SYSTEM_PROMPT: &str = r#"You are LandiAI, an AI assistant for the landing page builder "Landify". Your purpose is to answer user questions about the product. Landify is a platform for creating stunning landing pages. Its key features are:
- **Fast:** It has blazing fast performance.
- **Secure:** It uses top-notch security with SSL encryption.
- **Easy:** It has a simple and intuitive design for everyone, with no coding skills needed.
Answer the user's question concisely and accurately, referencing these features and the product's purpose."#;

/// Builder for constructing `AnswerFetcher` instances.
#[derive(Default)]
pub struct AnswerFetcherBuilder {
    transport: Option<Arc<dyn AnswerTransport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    policy: Option<RetryPolicy>,
}

impl AnswerFetcherBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transport used to reach the answer-generation endpoint.
    pub fn transport(mut self, transport: Arc<dyn AnswerTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the delay capability used between rate-limited attempts.
    ///
    /// Defaults to the tokio timer when not called.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Sets the retry policy. Defaults to 3 attempts, 1000ms base delay.
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the `AnswerFetcher`.
    ///
    /// # Panics
    ///
    /// Panics if `transport()` was not called.
    #[must_use]
    pub fn build(self) -> AnswerFetcher {
        AnswerFetcher {
            transport: self
                .transport
                .expect("transport must be set via transport() method"),
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            policy: self.policy.unwrap_or_default(),
        }
    }
}

/// Fetches grounded answers to product questions, retrying on throttling.
///
/// Holds no mutable state; concurrent `fetch_answer` calls are independent
/// and each owns its own retry counter.
pub struct AnswerFetcher {
    transport: Arc<dyn AnswerTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl AnswerFetcher {
    /// Creates a new `AnswerFetcher` with the specified transport and the
    /// default retry policy and sleeper.
    #[must_use]
    pub fn new(transport: Arc<dyn AnswerTransport>) -> Self {
        AnswerFetcherBuilder::new().transport(transport).build()
    }

    /// Answers a free-text question about the product.
    ///
    /// The question is trimmed before use; empty or whitespace-only input is
    /// rejected without any network activity. Rate-limited responses (429)
    /// are retried with exponential backoff up to the policy's attempt
    /// budget; every other failure is terminal on first occurrence.
    pub async fn fetch_answer(&self, question: &str) -> Result<Answer, FetchError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(FetchError::EmptyInput);
        }

        let payload = build_payload(question);

        for attempt in 0..self.policy.max_attempts {
            let response = self
                .transport
                .post_generate(&payload)
                .await
                .map_err(FetchError::Network)?;

            if response.is_success() {
                return parse_answer(&response.body);
            }

            if response.status == 429 {
                if attempt + 1 < self.policy.max_attempts {
                    self.sleeper.sleep(self.policy.delay_for(attempt)).await;
                    continue;
                }
                return Err(FetchError::RateLimited);
            }

            return Err(FetchError::Http {
                status: response.status,
            });
        }

        // Unreachable with max_attempts > 0; kept so every path resolves.
        Err(FetchError::Unknown)
    }
}

/// Builds the `generateContent` request payload for a question.
///
/// Embeds the fixed persona instruction and enables web-search grounding.
fn build_payload(question: &str) -> Value {
    serde_json::json!({
        "contents": [{ "parts": [{ "text": question }] }],
        "tools": [{ "google_search": {} }],
        "systemInstruction": {
            "parts": [{ "text": SYSTEM_PROMPT }]
        },
    })
}

/// Parses a 2xx response body into an `Answer`.
///
/// A body that is not JSON, or that lacks `candidates[0].content.parts[0].text`,
/// is `EmptyGeneration`: content absence on a successful response is terminal.
fn parse_answer(body: &str) -> Result<Answer, FetchError> {
    let json: Value = serde_json::from_str(body).map_err(|_| FetchError::EmptyGeneration)?;

    let candidate = json
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or(FetchError::EmptyGeneration)?;

    let text = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or(FetchError::EmptyGeneration)?;

    Ok(Answer::new(text.to_string(), collect_sources(candidate)))
}

/// Extracts web citations from a candidate's grounding metadata.
///
/// Attributions missing a uri or title (or carrying empty ones) are dropped
/// rather than surfaced; attribution display is best-effort.
fn collect_sources(candidate: &Value) -> Vec<Source> {
    candidate
        .get("groundingMetadata")
        .and_then(|m| m.get("groundingAttributions"))
        .and_then(|a| a.as_array())
        .map(|attributions| {
            attributions
                .iter()
                .filter_map(|attribution| {
                    let web = attribution.get("web")?;
                    let uri = web.get("uri").and_then(|u| u.as_str())?;
                    let title = web.get("title").and_then(|t| t.as_str())?;
                    if uri.is_empty() || title.is_empty() {
                        return None;
                    }
                    Some(Source::new(uri, title))
                })
                .collect()
        })
        .unwrap_or_default()
}
