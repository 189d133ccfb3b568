//! Chronicle Domain Layer
//!
//! This crate contains the core business logic and domain model for Chronicle,
//! a community archive of documents, photos and other items. It defines the
//! value objects and trait interfaces that the store, LLM, enricher and CLI
//! crates depend upon.
//!
//! ## Key Concepts
//!
//! - **FuzzyDate**: A date that may be a span (a decade, a century) and may be approximate
//! - **Timeline clusters**: Items grouped into period buckets (era, century, decade, year, month)
//! - **Facets**: A fixed taxonomy (era, location, subject, source type, language, sensitivity)
//! - **Translations**: Community translations ranked by votes
//! - **Citations**: APA, MLA, Chicago and BibTeX renderings of an item
//!
//! ## Architecture
//!
//! - Pure business logic only; no I/O
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod citation;
pub mod facet;
pub mod fuzzy_date;
pub mod item;
pub mod query;
pub mod timeline;
pub mod traits;
pub mod translation;

// Re-exports for convenience
pub use citation::{CitationData, CitationStyle};
pub use facet::{Facet, FacetCategory, FacetSelection, NewFacet};
pub use fuzzy_date::{parse_iso_date, render_fuzzy_date, DateError, DatePrecision, FuzzyDate};
pub use item::{ArchiveItem, DatedItem, ItemId, ItemMetadata, ItemType, TagUsage};
pub use query::{ItemListQuery, TimelineQuery};
pub use timeline::{
    auto_cluster_level, cluster_by_period, Bucket, Clusters, Dated, PeriodKey, SortOrder,
    TimeCluster,
};
pub use traits::{ArchiveStore, LlmProvider};
pub use translation::{
    AuthorType, NewTranslation, Translation, TranslationStatus, VoteChange, VoteOutcome, VoteType,
};
