//! Chronicle Enricher
//!
//! AI-assisted cataloguing for newly archived material.
//!
//! # Overview
//!
//! Given an item's title and extracted text, the Enricher asks an LLM to
//! suggest facets from the fixed taxonomy, a handful of tags and, for
//! content not already in the target language, a translation.
//!
//! # Architecture
//!
//! ```text
//! Content → Enricher → LLM → facets → tags → translation → EnrichmentResult
//! ```
//!
//! Every stage is bounded by a timeout. A stage that fails falls back to its
//! default and is listed in [`EnrichmentResult::failures`]; enrichment never
//! blocks an upload.
//!
//! # Example Usage
//!
//! ```
//! use chronicle_enricher::{Enricher, EnricherConfig, EnrichmentRequest};
//! use chronicle_llm::MockProvider;
//!
//! # tokio_test::block_on(async {
//! let mut llm = MockProvider::default();
//! llm.add_response_containing("JSON object only", r#"{"era": ["ww1"], "language": "en"}"#);
//! llm.add_response_containing("comma-separated", "trenches, letters, france");
//!
//! let enricher = Enricher::new(llm, EnricherConfig::default()).unwrap();
//! let request = EnrichmentRequest {
//!     title: "Letter home".to_string(),
//!     file_name: None,
//!     content_text: "Dear mother, the trenches are cold.".to_string(),
//! };
//!
//! let result = enricher.enrich(&request).await;
//! assert_eq!(result.facets.era, vec!["ww1"]);
//! assert_eq!(result.tags, vec!["trenches", "letters", "france"]);
//! assert!(result.translation.is_none());
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod enricher;
mod error;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use config::EnricherConfig;
pub use enricher::Enricher;
pub use error::EnricherError;
pub use parser::{parse_facet_response, parse_tags};
pub use prompt::{tag_prompt, translation_prompt, FacetPromptBuilder};
pub use types::{EnrichmentFailure, EnrichmentRequest, EnrichmentResult, EnrichmentStage};
