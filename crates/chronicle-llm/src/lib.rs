//! Chronicle LLM Provider Layer
//!
//! Text-generation backends used by the enrichment pipeline.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `chronicle-domain`.
//! Providers are built from an explicit [`LlmConfig`]; nothing here reads the environment.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use chronicle_llm::MockProvider;
//! use chronicle_domain::traits::LlmProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod ollama;

use chronicle_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Connection settings for a text-generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_endpoint() -> String {
    ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    ollama::DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    ollama::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    ollama::DEFAULT_MAX_RETRIES
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Prompts can be matched exactly or by a contained marker.
///
/// # Examples
///
/// ```
/// use chronicle_llm::MockProvider;
/// use chronicle_domain::traits::LlmProvider;
///
/// # tokio_test::block_on(async {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response_containing("tags", "a, b, c");
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.generate("suggest tags for this").await.unwrap(), "a, b, c");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    exact: Arc<Mutex<HashMap<String, MockReply>>>,
    containing: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            exact: Arc::new(Mutex::new(HashMap::new())),
            containing: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut exact) = self.exact.lock() {
            exact.insert(prompt.into(), MockReply::Text(response.into()));
        }
    }

    /// Respond to any prompt containing `marker`; first registered marker wins
    pub fn add_response_containing(
        &mut self,
        marker: impl Into<String>,
        response: impl Into<String>,
    ) {
        if let Ok(mut containing) = self.containing.lock() {
            containing.push((marker.into(), MockReply::Text(response.into())));
        }
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        if let Ok(mut exact) = self.exact.lock() {
            exact.insert(prompt.into(), MockReply::Fail);
        }
    }

    /// Fail any prompt containing `marker`
    pub fn add_error_containing(&mut self, marker: impl Into<String>) {
        if let Ok(mut containing) = self.containing.lock() {
            containing.push((marker.into(), MockReply::Fail));
        }
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        if let Some(reply) = self.exact.lock().ok().and_then(|m| m.get(prompt).cloned()) {
            return reply;
        }

        let contained = self.containing.lock().ok().and_then(|list| {
            list.iter()
                .find(|(marker, _)| prompt.contains(marker.as_str()))
                .map(|(_, reply)| reply.clone())
        });

        contained.unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match self.reply_for(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
