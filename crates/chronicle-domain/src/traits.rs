//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::facet::{Facet, FacetCategory};
use crate::fuzzy_date::FuzzyDate;
use crate::item::{ArchiveItem, ItemId, TagUsage};
use crate::query::{ItemListQuery, TimelineQuery};
use crate::translation::{NewTranslation, Translation, VoteType};
use std::future::Future;

/// Trait for storing and retrieving archive items
///
/// Implemented by the infrastructure layer (chronicle-store)
pub trait ArchiveStore {
    /// Error type for store operations
    type Error;

    /// Insert a new item with its date, tags and facet links
    fn insert_item(&mut self, item: &ArchiveItem) -> Result<ItemId, Self::Error>;

    /// Store a new item, bump its tag counts and add its translations as one unit
    ///
    /// Nothing is written when any part fails.
    fn archive_item(
        &mut self,
        item: &ArchiveItem,
        translations: &[NewTranslation],
    ) -> Result<ItemId, Self::Error>;

    /// Get an item by ID
    fn get_item(&self, id: ItemId) -> Result<Option<ArchiveItem>, Self::Error>;

    /// Find an item by the SHA-256 hash of its file
    fn find_by_hash(&self, sha256_hash: &str) -> Result<Option<ArchiveItem>, Self::Error>;

    /// Delete an item and everything attached to it
    fn delete_item(&mut self, id: ItemId) -> Result<(), Self::Error>;

    /// List items, newest first
    fn list_items(&self, query: &ItemListQuery) -> Result<Vec<ArchiveItem>, Self::Error>;

    /// Items for the timeline view, filtered and sorted by `query`
    fn timeline_items(&self, query: &TimelineQuery) -> Result<Vec<ArchiveItem>, Self::Error>;

    /// Replace the date of an item
    fn set_item_date(&mut self, id: ItemId, date: &FuzzyDate) -> Result<(), Self::Error>;

    /// Insert the default taxonomy unless facets already exist
    ///
    /// Returns the number of facets inserted.
    fn seed_default_facets(&mut self) -> Result<usize, Self::Error>;

    /// All facets, optionally restricted to one category
    fn list_facets(&self, category: Option<FacetCategory>) -> Result<Vec<Facet>, Self::Error>;

    /// Find a facet by category and display value (case-insensitive)
    fn find_facet_by_value(
        &self,
        category: FacetCategory,
        value: &str,
    ) -> Result<Option<Facet>, Self::Error>;

    /// Link a facet to an item
    fn attach_facet(&mut self, item_id: ItemId, facet_id: i64) -> Result<(), Self::Error>;

    /// Store a translation
    fn add_translation(&mut self, translation: &NewTranslation) -> Result<Translation, Self::Error>;

    /// Translations of an item, most upvoted first
    fn get_translations(
        &self,
        item_id: ItemId,
        language_code: Option<&str>,
    ) -> Result<Vec<Translation>, Self::Error>;

    /// Cast, switch or withdraw a vote and return the updated translation
    fn vote_translation(
        &mut self,
        translation_id: i64,
        voter: &str,
        vote: VoteType,
    ) -> Result<Translation, Self::Error>;

    /// Bump usage counts for tags, creating unseen ones
    fn record_tags(&mut self, tags: &[String]) -> Result<(), Self::Error>;

    /// Tags by usage, most used first
    fn list_tags(&self, limit: Option<usize>) -> Result<Vec<TagUsage>, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (chronicle-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a text completion
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Model name, for logging
    fn model_name(&self) -> &str;
}
