//! Error types for the CLI application.

use chronicle_domain::DateError;
use chronicle_enricher::EnricherError;
use chronicle_llm::LlmError;
use chronicle_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// LLM provider could not be set up
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Enrichment could not be set up
    #[error(transparent)]
    Enricher(#[from] EnricherError),

    /// Invalid date input
    #[error("Invalid date: {0}")]
    Date(#[from] DateError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// File already archived
    #[error("Duplicate: {0}")]
    Duplicate(String),
}
