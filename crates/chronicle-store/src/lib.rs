//! Chronicle Storage Layer
//!
//! Implements the ArchiveStore trait using SQLite.
//!
//! # Architecture
//!
//! - One row per item; tags and metadata kept as JSON columns
//! - Item dates in their own table with day numbers for range lookups
//! - Facets, translations, votes and tag counts in relational tables
//!
//! # Examples
//!
//! ```no_run
//! use chronicle_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for item operations
//! ```

#![warn(missing_docs)]

use chrono::{Datelike, NaiveDate};
use chronicle_domain::facet::{default_facets, slugify};
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::translation::{sort_for_display, tally_vote};
use chronicle_domain::{
    ArchiveItem, AuthorType, DatePrecision, Facet, FacetCategory, FuzzyDate, ItemId,
    ItemListQuery, ItemMetadata, ItemType, NewTranslation, TagUsage, TimelineQuery, Translation,
    TranslationStatus, VoteOutcome, VoteType,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Item already stored (same id or same file hash)
    #[error("Duplicate item: {0}")]
    Duplicate(String),
}

const ITEM_COLUMNS: &str = "id, title, description, item_type, file_name, file_size, mime_type, \
     sha256_hash, content_text, tags, metadata, uploader, original_language, is_sensitive, created_at";

const TRANSLATION_COLUMNS: &str = "id, item_id, language_code, author, author_type, content, \
     status, upvotes, downvotes, created_at";

/// SQLite-based implementation of ArchiveStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chronicle_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("chronicle.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening archive database");
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert ItemId to bytes for storage
    fn item_id_to_bytes(id: ItemId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to ItemId
    fn bytes_to_item_id(bytes: &[u8]) -> Result<ItemId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for ItemId, got {}", bytes.len()))
        })?;
        Ok(ItemId::from_value(u128::from_be_bytes(arr)))
    }

    fn day_number(date: NaiveDate) -> i64 {
        i64::from(date.num_days_from_ce())
    }

    fn date_from_day(day: i64) -> Result<NaiveDate, StoreError> {
        i32::try_from(day)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| StoreError::InvalidData(format!("Day number out of range: {}", day)))
    }

    fn item_exists(&self, id_bytes: &[u8]) -> Result<bool, StoreError> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM items WHERE id = ?1", params![id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    /// Map an `items` row; date and facets are filled in by [`Self::hydrate`]
    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<ArchiveItem> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_item_id(&id_bytes).map_err(|e| conversion_error(0, Type::Blob, e))?;

        let type_str: String = row.get(3)?;
        let item_type = ItemType::parse(&type_str).ok_or_else(|| {
            conversion_error(
                3,
                Type::Text,
                StoreError::InvalidData(format!("Unknown item type: {}", type_str)),
            )
        })?;

        let tags_json: String = row.get(9)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| conversion_error(9, Type::Text, StoreError::InvalidData(e.to_string())))?;

        let metadata_json: String = row.get(10)?;
        let metadata: ItemMetadata = serde_json::from_str(&metadata_json)
            .map_err(|e| conversion_error(10, Type::Text, StoreError::InvalidData(e.to_string())))?;

        let file_size: Option<i64> = row.get(5)?;

        Ok(ArchiveItem {
            id,
            title: row.get(1)?,
            description: row.get(2)?,
            item_type,
            file_name: row.get(4)?,
            file_size: file_size.map(|s| s as u64),
            mime_type: row.get(6)?,
            sha256_hash: row.get(7)?,
            content_text: row.get(8)?,
            tags,
            metadata,
            uploader: row.get(11)?,
            original_language: row.get(12)?,
            is_sensitive: row.get(13)?,
            created_at: row.get::<_, i64>(14)? as u64,
            date: None,
            facets: Vec::new(),
        })
    }

    /// Load the date and facets of an item
    fn hydrate(&self, mut item: ArchiveItem) -> Result<ArchiveItem, StoreError> {
        let id_bytes = Self::item_id_to_bytes(item.id);
        item.date = self.load_date(&id_bytes)?;
        item.facets = self.load_item_facets(&id_bytes)?;
        Ok(item)
    }

    fn load_date(&self, id_bytes: &[u8]) -> Result<Option<FuzzyDate>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT start_day, end_day, display_date, is_approximate, precision
                 FROM item_dates WHERE item_id = ?1",
                params![id_bytes],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, bool>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((start_day, end_day, display_date, is_approximate, precision)) = row else {
            return Ok(None);
        };

        let precision = match precision {
            Some(p) => Some(DatePrecision::parse(&p).ok_or_else(|| {
                StoreError::InvalidData(format!("Unknown date precision: {}", p))
            })?),
            None => None,
        };

        let date = FuzzyDate::new(
            Self::date_from_day(start_day)?,
            Self::date_from_day(end_day)?,
            is_approximate,
            precision,
        )
        .map_err(|e| StoreError::InvalidData(e.to_string()))?
        .with_display_date(display_date);

        Ok(Some(date))
    }

    fn load_item_facets(&self, id_bytes: &[u8]) -> Result<Vec<Facet>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT f.id, f.category, f.value, f.slug, f.description, f.is_required, f.sort_order
             FROM facets f JOIN item_facets x ON x.facet_id = f.id
             WHERE x.item_id = ?1
             ORDER BY f.category, f.sort_order",
        )?;
        let facets = stmt
            .query_map(params![id_bytes], row_to_facet)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(facets)
    }

    fn write_date(conn: &Connection, id_bytes: &[u8], date: &FuzzyDate) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO item_dates
                 (item_id, date_start, date_end, start_day, end_day, display_date, is_approximate, precision)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(item_id) DO UPDATE SET
                 date_start = excluded.date_start, date_end = excluded.date_end,
                 start_day = excluded.start_day, end_day = excluded.end_day,
                 display_date = excluded.display_date, is_approximate = excluded.is_approximate,
                 precision = excluded.precision",
            params![
                id_bytes,
                date.date_start().to_string(),
                date.date_end().to_string(),
                Self::day_number(date.date_start()),
                Self::day_number(date.date_end()),
                date.display_date(),
                date.is_approximate(),
                date.precision().map(|p| p.as_str()),
            ],
        )?;
        Ok(())
    }

    /// Reject an item whose id or file hash is already stored
    fn check_new_item(&self, item: &ArchiveItem) -> Result<(), StoreError> {
        if self.item_exists(&Self::item_id_to_bytes(item.id))? {
            return Err(StoreError::Duplicate(format!("item {} already exists", item.id)));
        }

        if let Some(hash) = &item.sha256_hash {
            if let Some(existing) = self.find_by_hash(hash)? {
                return Err(StoreError::Duplicate(format!(
                    "file already archived as \"{}\" ({})",
                    existing.title, existing.id
                )));
            }
        }
        Ok(())
    }

    /// Item row plus its date and facet links
    fn write_item(conn: &Connection, item: &ArchiveItem) -> Result<(), StoreError> {
        let id_bytes = Self::item_id_to_bytes(item.id);
        let tags = serde_json::to_string(&item.tags)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;
        let metadata = serde_json::to_string(&item.metadata)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        conn.execute(
            &format!(
                "INSERT INTO items ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                ITEM_COLUMNS
            ),
            params![
                &id_bytes,
                &item.title,
                &item.description,
                item.item_type.as_str(),
                &item.file_name,
                item.file_size.map(|s| s as i64),
                &item.mime_type,
                &item.sha256_hash,
                &item.content_text,
                tags,
                metadata,
                &item.uploader,
                &item.original_language,
                item.is_sensitive,
                item.created_at as i64,
            ],
        )?;
        if let Some(date) = &item.date {
            Self::write_date(conn, &id_bytes, date)?;
        }
        for facet in &item.facets {
            conn.execute(
                "INSERT OR IGNORE INTO item_facets (item_id, facet_id) VALUES (?1, ?2)",
                params![&id_bytes, facet.id],
            )?;
        }
        Ok(())
    }

    fn write_tags(conn: &Connection, tags: &[String]) -> Result<(), StoreError> {
        for tag in tags {
            let name = tag.trim();
            let slug = slugify(name);
            if slug.is_empty() {
                continue;
            }
            conn.execute(
                "INSERT INTO tags (name, slug, usage_count) VALUES (?1, ?2, 1)
                 ON CONFLICT(slug) DO UPDATE SET usage_count = usage_count + 1",
                params![name, slug],
            )?;
        }
        Ok(())
    }

    /// Insert a translation row and return its id
    fn write_translation(conn: &Connection, translation: &NewTranslation) -> Result<i64, StoreError> {
        conn.execute(
            "INSERT INTO translations (item_id, language_code, author, author_type, content, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::item_id_to_bytes(translation.item_id),
                &translation.language_code,
                &translation.author,
                translation.author_type.as_str(),
                &translation.content,
                translation.status.as_str(),
                translation.created_at as i64,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn query_items(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ArchiveItem>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|item| self.hydrate(item)).collect()
    }

    fn get_translation(&self, id: i64) -> Result<Option<Translation>, StoreError> {
        let translation = self
            .conn
            .query_row(
                &format!("SELECT {} FROM translations WHERE id = ?1", TRANSLATION_COLUMNS),
                params![id],
                row_to_translation,
            )
            .optional()?;
        Ok(translation)
    }
}

fn conversion_error(column: usize, ty: Type, err: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
}

fn row_to_facet(row: &Row<'_>) -> rusqlite::Result<Facet> {
    let category_str: String = row.get(1)?;
    let category = FacetCategory::parse(&category_str).ok_or_else(|| {
        conversion_error(
            1,
            Type::Text,
            StoreError::InvalidData(format!("Unknown facet category: {}", category_str)),
        )
    })?;

    Ok(Facet {
        id: row.get(0)?,
        category,
        value: row.get(2)?,
        slug: row.get(3)?,
        description: row.get(4)?,
        is_required: row.get(5)?,
        sort_order: row.get(6)?,
    })
}

fn row_to_translation(row: &Row<'_>) -> rusqlite::Result<Translation> {
    let item_bytes: Vec<u8> = row.get(1)?;
    let item_id =
        SqliteStore::bytes_to_item_id(&item_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?;

    let author_type_str: String = row.get(4)?;
    let author_type = AuthorType::parse(&author_type_str).ok_or_else(|| {
        conversion_error(
            4,
            Type::Text,
            StoreError::InvalidData(format!("Unknown author type: {}", author_type_str)),
        )
    })?;

    let status_str: String = row.get(6)?;
    let status = TranslationStatus::parse(&status_str).ok_or_else(|| {
        conversion_error(
            6,
            Type::Text,
            StoreError::InvalidData(format!("Unknown translation status: {}", status_str)),
        )
    })?;

    Ok(Translation {
        id: row.get(0)?,
        item_id,
        language_code: row.get(2)?,
        author: row.get(3)?,
        author_type,
        content: row.get(5)?,
        status,
        upvotes: row.get(7)?,
        downvotes: row.get(8)?,
        created_at: row.get::<_, i64>(9)? as u64,
    })
}

impl ArchiveStore for SqliteStore {
    type Error = StoreError;

    fn insert_item(&mut self, item: &ArchiveItem) -> Result<ItemId, Self::Error> {
        self.check_new_item(item)?;

        let tx = self.conn.transaction()?;
        Self::write_item(&tx, item)?;
        tx.commit()?;

        info!(id = %item.id, title = %item.title, "archived item");
        Ok(item.id)
    }

    fn archive_item(
        &mut self,
        item: &ArchiveItem,
        translations: &[NewTranslation],
    ) -> Result<ItemId, Self::Error> {
        self.check_new_item(item)?;

        let tx = self.conn.transaction()?;
        Self::write_item(&tx, item)?;
        Self::write_tags(&tx, &item.tags)?;
        for translation in translations {
            Self::write_translation(&tx, translation)?;
        }
        tx.commit()?;

        info!(
            id = %item.id,
            title = %item.title,
            translations = translations.len(),
            "archived item"
        );
        Ok(item.id)
    }

    fn get_item(&self, id: ItemId) -> Result<Option<ArchiveItem>, Self::Error> {
        let id_bytes = Self::item_id_to_bytes(id);
        let item = self
            .conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                params![&id_bytes],
                Self::row_to_item,
            )
            .optional()?;

        item.map(|item| self.hydrate(item)).transpose()
    }

    fn find_by_hash(&self, sha256_hash: &str) -> Result<Option<ArchiveItem>, Self::Error> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {} FROM items WHERE sha256_hash = ?1", ITEM_COLUMNS),
                params![sha256_hash],
                Self::row_to_item,
            )
            .optional()?;

        item.map(|item| self.hydrate(item)).transpose()
    }

    fn delete_item(&mut self, id: ItemId) -> Result<(), Self::Error> {
        let id_bytes = Self::item_id_to_bytes(id);
        let deleted = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1", params![&id_bytes])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("item {}", id)));
        }
        info!(id = %id, "deleted item");
        Ok(())
    }

    fn list_items(&self, query: &ItemListQuery) -> Result<Vec<ArchiveItem>, Self::Error> {
        let mut sql = format!("SELECT {} FROM items WHERE 1=1", ITEM_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(item_type) = query.item_type {
            sql.push_str(" AND item_type = ?");
            params.push(Box::new(item_type.as_str()));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let items = self.query_items(&sql, &param_refs)?;

        let wanted = query.tag.as_ref().map(|t| vec![t.clone()]);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(items
            .into_iter()
            .filter(|item| wanted.as_ref().is_none_or(|w| item.has_any_tag(w)))
            .skip(query.offset)
            .take(limit)
            .collect())
    }

    fn timeline_items(&self, query: &TimelineQuery) -> Result<Vec<ArchiveItem>, Self::Error> {
        let mut sql = format!(
            "SELECT {} FROM items i WHERE 1=1",
            ITEM_COLUMNS
                .split(", ")
                .map(|c| format!("i.{}", c))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if query.has_range() {
            sql.push_str(" AND EXISTS (SELECT 1 FROM item_dates d WHERE d.item_id = i.id");
            if let Some(start) = query.start {
                sql.push_str(" AND d.end_day >= ?");
                params.push(Box::new(Self::day_number(start)));
            }
            if let Some(end) = query.end {
                sql.push_str(" AND d.start_day <= ?");
                params.push(Box::new(Self::day_number(end)));
            }
            sql.push(')');
        }

        if let Some(item_type) = query.item_type {
            sql.push_str(" AND i.item_type = ?");
            params.push(Box::new(item_type.as_str()));
        }

        sql.push_str(" ORDER BY i.created_at DESC");

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let candidates = self.query_items(&sql, &param_refs)?;
        debug!(candidates = candidates.len(), "timeline range lookup");

        Ok(query.apply(candidates))
    }

    fn set_item_date(&mut self, id: ItemId, date: &FuzzyDate) -> Result<(), Self::Error> {
        let id_bytes = Self::item_id_to_bytes(id);
        if !self.item_exists(&id_bytes)? {
            return Err(StoreError::NotFound(format!("item {}", id)));
        }
        Self::write_date(&self.conn, &id_bytes, date)?;
        debug!(id = %id, date = %date, "set item date");
        Ok(())
    }

    fn seed_default_facets(&mut self) -> Result<usize, Self::Error> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM facets", [], |row| row.get(0))?;
        if existing > 0 {
            debug!(existing, "facets already seeded");
            return Ok(0);
        }

        let facets = default_facets();
        let tx = self.conn.transaction()?;
        for facet in &facets {
            tx.execute(
                "INSERT INTO facets (category, value, slug, description, is_required, sort_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    facet.category.as_str(),
                    &facet.value,
                    &facet.slug,
                    &facet.description,
                    facet.is_required,
                    facet.sort_order,
                ],
            )?;
        }
        tx.commit()?;

        info!(count = facets.len(), "seeded default facets");
        Ok(facets.len())
    }

    fn list_facets(&self, category: Option<FacetCategory>) -> Result<Vec<Facet>, Self::Error> {
        let base = "SELECT id, category, value, slug, description, is_required, sort_order FROM facets";
        let facets = match category {
            Some(category) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{} WHERE category = ?1 ORDER BY sort_order, id",
                    base
                ))?;
                let rows = stmt.query_map(params![category.as_str()], row_to_facet)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    self.conn.prepare(&format!("{} ORDER BY category, sort_order, id", base))?;
                let rows = stmt.query_map([], row_to_facet)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(facets)
    }

    fn find_facet_by_value(
        &self,
        category: FacetCategory,
        value: &str,
    ) -> Result<Option<Facet>, Self::Error> {
        let facet = self
            .conn
            .query_row(
                "SELECT id, category, value, slug, description, is_required, sort_order
                 FROM facets
                 WHERE category = ?1 AND (lower(value) = lower(?2) OR slug = ?3)
                 ORDER BY sort_order LIMIT 1",
                params![category.as_str(), value.trim(), slugify(value)],
                row_to_facet,
            )
            .optional()?;
        Ok(facet)
    }

    fn attach_facet(&mut self, item_id: ItemId, facet_id: i64) -> Result<(), Self::Error> {
        let id_bytes = Self::item_id_to_bytes(item_id);
        if !self.item_exists(&id_bytes)? {
            return Err(StoreError::NotFound(format!("item {}", item_id)));
        }
        let facet_exists = self
            .conn
            .query_row("SELECT 1 FROM facets WHERE id = ?1", params![facet_id], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        if !facet_exists {
            return Err(StoreError::NotFound(format!("facet {}", facet_id)));
        }

        self.conn.execute(
            "INSERT OR IGNORE INTO item_facets (item_id, facet_id) VALUES (?1, ?2)",
            params![&id_bytes, facet_id],
        )?;
        Ok(())
    }

    fn add_translation(&mut self, translation: &NewTranslation) -> Result<Translation, Self::Error> {
        let item_bytes = Self::item_id_to_bytes(translation.item_id);
        if !self.item_exists(&item_bytes)? {
            return Err(StoreError::NotFound(format!("item {}", translation.item_id)));
        }

        let id = Self::write_translation(&self.conn, translation)?;
        debug!(id, item = %translation.item_id, language = %translation.language_code, "added translation");

        self.get_translation(id)?
            .ok_or_else(|| StoreError::NotFound(format!("translation {}", id)))
    }

    fn get_translations(
        &self,
        item_id: ItemId,
        language_code: Option<&str>,
    ) -> Result<Vec<Translation>, Self::Error> {
        let item_bytes = Self::item_id_to_bytes(item_id);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM translations
             WHERE item_id = ?1 AND (?2 IS NULL OR language_code = ?2)
             ORDER BY id DESC",
            TRANSLATION_COLUMNS
        ))?;
        let mut translations = stmt
            .query_map(params![&item_bytes, language_code], row_to_translation)?
            .collect::<Result<Vec<_>, _>>()?;
        // Stable sort, so ties keep the newest row first
        sort_for_display(&mut translations);
        Ok(translations)
    }

    fn vote_translation(
        &mut self,
        translation_id: i64,
        voter: &str,
        vote: VoteType,
    ) -> Result<Translation, Self::Error> {
        let current = self
            .get_translation(translation_id)?
            .ok_or_else(|| StoreError::NotFound(format!("translation {}", translation_id)))?;

        let tx = self.conn.transaction()?;
        let previous: Option<String> = tx
            .query_row(
                "SELECT vote_type FROM translation_votes WHERE translation_id = ?1 AND voter = ?2",
                params![translation_id, voter],
                |row| row.get(0),
            )
            .optional()?;
        let previous = match previous {
            Some(v) => Some(VoteType::parse(&v).ok_or_else(|| {
                StoreError::InvalidData(format!("Unknown vote type: {}", v))
            })?),
            None => None,
        };

        let change = tally_vote(previous, vote);
        match change.outcome {
            VoteOutcome::Recorded => {
                tx.execute(
                    "INSERT INTO translation_votes (translation_id, voter, vote_type) VALUES (?1, ?2, ?3)",
                    params![translation_id, voter, vote.as_str()],
                )?;
            }
            VoteOutcome::Removed => {
                tx.execute(
                    "DELETE FROM translation_votes WHERE translation_id = ?1 AND voter = ?2",
                    params![translation_id, voter],
                )?;
            }
            VoteOutcome::Changed => {
                tx.execute(
                    "UPDATE translation_votes SET vote_type = ?3 WHERE translation_id = ?1 AND voter = ?2",
                    params![translation_id, voter, vote.as_str()],
                )?;
            }
        }

        let (upvotes, downvotes) = change.apply(current.upvotes, current.downvotes);
        tx.execute(
            "UPDATE translations SET upvotes = ?2, downvotes = ?3 WHERE id = ?1",
            params![translation_id, upvotes, downvotes],
        )?;
        tx.commit()?;

        debug!(translation_id, voter, outcome = ?change.outcome, "vote tallied");
        Ok(Translation {
            upvotes,
            downvotes,
            ..current
        })
    }

    fn record_tags(&mut self, tags: &[String]) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        Self::write_tags(&tx, tags)?;
        tx.commit()?;
        Ok(())
    }

    fn list_tags(&self, limit: Option<usize>) -> Result<Vec<TagUsage>, Self::Error> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            "SELECT name, slug, usage_count FROM tags ORDER BY usage_count DESC, name ASC LIMIT ?1",
        )?;
        let tags = stmt
            .query_map(params![limit], |row| {
                Ok(TagUsage {
                    name: row.get(0)?,
                    slug: row.get(1)?,
                    usage_count: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}
