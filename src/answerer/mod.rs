//! Resilient FAQ answering over an external generative-language API.
//!
//! This module provides the `AnswerFetcher` struct, which wraps a single
//! `generateContent` call in bounded retry with exponential backoff and maps
//! every outcome to a categorized result the caller can render.

mod answer_fetcher;
mod retry;
mod types;

pub use answer_fetcher::{AnswerFetcher, AnswerFetcherBuilder};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use types::{Answer, FetchError, Source};
