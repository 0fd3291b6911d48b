pub mod answerer;
pub mod gemini;

pub use answerer::{
    Answer, AnswerFetcher, AnswerFetcherBuilder, FetchError, RetryPolicy, Sleeper, Source,
    TokioSleeper,
};
pub use gemini::{AnswerTransport, ApiResponse, GeminiClient, GeminiClientBuilder, TransportError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let source = Source::new("https://example.com", "Example");
        assert_eq!(source.title, "Example");

        let answer = Answer::new("text".to_string(), vec![source]);
        assert!(answer.has_sources());

        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
    }
}
