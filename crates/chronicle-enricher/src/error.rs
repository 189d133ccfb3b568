//! Error types for the Enricher

use thiserror::Error;

/// Errors raised inside the enrichment pipeline
///
/// None of these escape [`crate::Enricher::enrich`]; they are logged and
/// recorded as failures on the result.
#[derive(Error, Debug)]
pub enum EnricherError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Provider call exceeded the configured timeout
    #[error("LLM call timed out after {0}s")]
    Timeout(u64),

    /// Response did not have the expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EnricherError {
    fn from(e: serde_json::Error) -> Self {
        EnricherError::JsonParse(e.to_string())
    }
}
