/// Gemini HTTP client module.
///
/// This module provides an async HTTP client for the generative-language
/// `generateContent` API, including error handling, builder-based
/// configuration, and the transport trait the answerer layer depends on.
mod client;

pub use client::{AnswerTransport, ApiResponse, GeminiClient, GeminiClientBuilder, TransportError};
