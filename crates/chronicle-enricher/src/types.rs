//! Request and response types for enrichment

use chronicle_domain::{FacetSelection, ItemMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Material to enrich
#[derive(Debug, Clone, Default)]
pub struct EnrichmentRequest {
    /// Item title
    pub title: String,

    /// Original file name, if any
    pub file_name: Option<String>,

    /// Extracted text; enrichment is skipped when blank
    pub content_text: String,
}

/// Pipeline stage that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStage {
    /// Facet suggestion
    Facets,
    /// Tag generation
    Tags,
    /// Translation
    Translation,
}

impl fmt::Display for EnrichmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnrichmentStage::Facets => "facets",
            EnrichmentStage::Tags => "tags",
            EnrichmentStage::Translation => "translation",
        };
        write!(f, "{}", name)
    }
}

/// A stage that fell back to its default value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentFailure {
    /// Where it happened
    pub stage: EnrichmentStage,

    /// Reason for failure
    pub reason: String,
}

/// Output of the pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    /// Suggested tags, lowercased
    pub tags: Vec<String>,

    /// Suggested facets
    pub facets: FacetSelection,

    /// Translation into the target language
    pub translation: Option<String>,

    /// Stages that fell back to defaults
    pub failures: Vec<EnrichmentFailure>,
}

impl EnrichmentResult {
    /// Whether every attempted stage succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Metadata to record on the item
    pub fn item_metadata(&self) -> ItemMetadata {
        ItemMetadata {
            ai_suggested_facets: (!self.facets.is_empty()).then(|| self.facets.clone()),
            ai_generated_tags: self.tags.clone(),
            ..ItemMetadata::default()
        }
    }
}
