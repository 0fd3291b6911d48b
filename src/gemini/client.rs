/// Gemini HTTP client implementation.
///
/// This module provides `GeminiClient` for making async HTTP requests to the
/// generative-language API, along with error types and builder patterns for
/// configuration.
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur at the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Invalid URL configuration error
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No API key was configured
    #[error("missing API key: set GEMINI_API_KEY or call api_key()")]
    MissingApiKey,
}

/// A raw HTTP response: status code plus unparsed body text.
///
/// Body parsing is the caller's concern; the transport only distinguishes
/// "a response arrived" from "no response arrived".
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as received
    pub body: String,
}

impl ApiResponse {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing `generateContent` requests.
///
/// This trait enables mocking in tests and keeps the retry loop independent
/// of the concrete HTTP stack.
#[async_trait]
pub trait AnswerTransport: Send + Sync {
    /// POSTs the given JSON payload to the answer-generation endpoint.
    ///
    /// Returns the raw response (any status) on arrival, or a
    /// `TransportError` when no response was received at all.
    async fn post_generate(&self, payload: &serde_json::Value)
    -> Result<ApiResponse, TransportError>;
}

/// Builder for constructing `GeminiClient` instances.
///
/// # Examples
///
/// ```no_run
/// use landi::gemini::GeminiClientBuilder;
///
/// let client = GeminiClientBuilder::new()
///     .api_key("secret")
///     .model("gemini-2.5-flash-preview-05-20")
///     .build()
///     .expect("Failed to create client");
/// ```
#[derive(Debug, Default)]
pub struct GeminiClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new `GeminiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL for the generative-language API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model name used for `generateContent` calls.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the `GeminiClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If the corresponding setter was not called, this method falls back to
    /// `GEMINI_BASE_URL`, `GEMINI_MODEL`, and `GEMINI_API_KEY`. The base URL
    /// defaults to `https://generativelanguage.googleapis.com` and the model
    /// to `gemini-2.5-flash-preview-05-20`; the API key has no default and
    /// its absence is a build error.
    pub fn build(self) -> Result<GeminiClient, TransportError> {
        // Determine each setting: builder value, then env var, then default
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string())
        };

        let model = if let Some(m) = self.model {
            m
        } else {
            std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-preview-05-20".to_string())
        };

        let api_key = match self.api_key {
            Some(k) => k,
            None => std::env::var("GEMINI_API_KEY").map_err(|_| TransportError::MissingApiKey)?,
        };
        if api_key.trim().is_empty() {
            return Err(TransportError::MissingApiKey);
        }

        // Validate URL
        reqwest::Url::parse(&base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Create reqwest client with timeout configuration
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(TransportError::Network)?;

        Ok(GeminiClient {
            client,
            base_url,
            model,
            api_key,
        })
    }
}

/// Async HTTP client for the generative-language `generateContent` endpoint.
///
/// Construct via `GeminiClientBuilder`. Retry and response interpretation
/// live in the answerer layer; this client only moves bytes.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the full `generateContent` endpoint URL, key included.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl AnswerTransport for GeminiClient {
    async fn post_generate(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(e)
                } else {
                    TransportError::Network(e)
                }
            })?;

        let status = response.status().as_u16();
        // Reading the body can still fail mid-stream; that is a transport
        // failure, not a malformed-content condition.
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e)
            } else {
                TransportError::Network(e)
            }
        })?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::error::Error;

    #[test]
    fn network_error_variant_creation_and_display() {
        // Create a reqwest error by building a request with an invalid URL
        let client = reqwest::Client::new();
        let reqwest_error = client.get("not-a-valid-url").build().unwrap_err();
        let err = TransportError::Network(reqwest_error);

        let msg = format!("{}", err);
        assert!(msg.contains("network error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn timeout_error_variant_display() {
        let client = reqwest::Client::new();
        let reqwest_error = client.get("http://").build().unwrap_err();
        let err = TransportError::Timeout(reqwest_error);

        assert_eq!(format!("{}", err), "request timed out");
    }

    #[test]
    fn api_response_success_range() {
        let ok = ApiResponse {
            status: 200,
            body: String::new(),
        };
        assert!(ok.is_success());

        let created = ApiResponse {
            status: 204,
            body: String::new(),
        };
        assert!(created.is_success());

        let throttled = ApiResponse {
            status: 429,
            body: String::new(),
        };
        assert!(!throttled.is_success());

        let redirect = ApiResponse {
            status: 301,
            body: String::new(),
        };
        assert!(!redirect.is_success());
    }

    #[test]
    fn builder_new_creates_builder_with_defaults() {
        let builder = GeminiClientBuilder::new();
        assert!(builder.base_url.is_none());
        assert!(builder.model.is_none());
        assert!(builder.api_key.is_none());
    }

    #[test]
    #[serial]
    fn build_uses_default_url_and_model_when_not_set() {
        unsafe {
            std::env::remove_var("GEMINI_BASE_URL");
            std::env::remove_var("GEMINI_MODEL");
        }

        let client = GeminiClientBuilder::new().api_key("k").build().unwrap();
        assert_eq!(client.base_url(), "https://generativelanguage.googleapis.com");
        assert_eq!(client.model(), "gemini-2.5-flash-preview-05-20");
    }

    #[test]
    #[serial]
    fn build_reads_environment_variables_if_set() {
        unsafe {
            std::env::set_var("GEMINI_BASE_URL", "https://custom.example");
            std::env::set_var("GEMINI_MODEL", "custom-model");
            std::env::set_var("GEMINI_API_KEY", "env-key");
        }

        let client = GeminiClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url(), "https://custom.example");
        assert_eq!(client.model(), "custom-model");

        unsafe {
            std::env::remove_var("GEMINI_BASE_URL");
            std::env::remove_var("GEMINI_MODEL");
            std::env::remove_var("GEMINI_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn builder_values_take_precedence_over_env_vars() {
        unsafe {
            std::env::set_var("GEMINI_MODEL", "env-model");
        }

        let client = GeminiClientBuilder::new()
            .api_key("k")
            .model("builder-model")
            .build()
            .unwrap();
        assert_eq!(client.model(), "builder-model");

        unsafe {
            std::env::remove_var("GEMINI_MODEL");
        }
    }

    #[test]
    #[serial]
    fn build_fails_without_api_key() {
        unsafe {
            std::env::remove_var("GEMINI_API_KEY");
        }

        let result = GeminiClientBuilder::new().build();
        assert!(matches!(result, Err(TransportError::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn build_rejects_blank_api_key() {
        let result = GeminiClientBuilder::new().api_key("   ").build();
        assert!(matches!(result, Err(TransportError::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn build_returns_error_if_invalid_url_provided() {
        let result = GeminiClientBuilder::new()
            .api_key("k")
            .base_url("not-a-valid-url")
            .build();
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    #[serial]
    fn endpoint_embeds_model_and_key() {
        let client = GeminiClientBuilder::new()
            .base_url("https://host.example")
            .model("m1")
            .api_key("k1")
            .build()
            .unwrap();

        assert_eq!(
            client.endpoint(),
            "https://host.example/v1beta/models/m1:generateContent?key=k1"
        );
    }
}
