//! Archive item module - the unit of the archive

use crate::facet::{Facet, FacetSelection};
use crate::fuzzy_date::FuzzyDate;
use crate::timeline::Dated;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

/// Unique identifier for an archive item based on UUIDv7
///
/// UUIDv7 sorts by creation time, so listing by id is listing by upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u128);

impl ItemId {
    /// Generate a new UUIDv7-based ItemId
    ///
    /// # Examples
    ///
    /// ```
    /// use chronicle_domain::ItemId;
    ///
    /// let id = ItemId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an ItemId from a raw u128 value (storage layer)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an ItemId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid item id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Short prefix for tables
    pub fn short(&self) -> String {
        self.to_string()[..8].to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl std::str::FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for ItemId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Kind of archived material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// PDFs, word processor files
    Document,
    /// Images
    Photo,
    /// Plain text
    Text,
    /// Compressed bundles
    Archive,
    /// Audio, video and anything else
    Other,
}

impl ItemType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Document => "document",
            ItemType::Photo => "photo",
            ItemType::Text => "text",
            ItemType::Archive => "archive",
            ItemType::Other => "other",
        }
    }

    /// Parse a type from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "document" => Some(ItemType::Document),
            "photo" => Some(ItemType::Photo),
            "text" => Some(ItemType::Text),
            "archive" => Some(ItemType::Archive),
            "other" => Some(ItemType::Other),
            _ => None,
        }
    }

    /// Classify by MIME type
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            m if m.starts_with("image/") => ItemType::Photo,
            m if m.starts_with("text/") => ItemType::Text,
            "application/pdf"
            | "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                ItemType::Document
            }
            "application/zip"
            | "application/x-zip-compressed"
            | "application/x-rar-compressed"
            | "application/x-7z-compressed" => ItemType::Archive,
            _ => ItemType::Other,
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid item type: {}", s))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME type for a file name, from its extension
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" | "text" => "text/plain",
        "md" => "text/markdown",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "m4a" => "audio/m4a",
        "mp4" => "video/mp4",
        "mpeg" | "mpg" => "video/mpeg",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "zip" => "application/zip",
        "rar" => "application/x-rar-compressed",
        "7z" => "application/x-7z-compressed",
        _ => return None,
    };
    Some(mime)
}

/// Human-readable file size with 1024-based units
///
/// # Examples
///
/// ```
/// use chronicle_domain::item::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1u64 << (10 * (exponent + 1)) {
        exponent += 1;
    }
    let scaled = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}

/// Trim tags, drop empties and case-insensitive duplicates, keep first spelling
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

/// A tag and how many items use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagUsage {
    /// Tag as first written
    pub name: String,
    /// Lookup key
    pub slug: String,
    /// Number of times the tag was recorded
    pub usage_count: u64,
}

/// Free-form metadata recorded alongside an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetadata {
    /// Facets proposed by the enrichment pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggested_facets: Option<FacetSelection>,

    /// Tags proposed by the enrichment pipeline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ai_generated_tags: Vec<String>,

    /// Anything else
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// An archived document or media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
    /// Unique identifier
    pub id: ItemId,
    /// Title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Kind of material
    pub item_type: ItemType,
    /// Original file name
    pub file_name: Option<String>,
    /// File size in bytes
    pub file_size: Option<u64>,
    /// MIME type of the file
    pub mime_type: Option<String>,
    /// Hex SHA-256 of the file contents, used to reject duplicate uploads
    pub sha256_hash: Option<String>,
    /// Extracted text for search
    pub content_text: Option<String>,
    /// Free tags
    pub tags: Vec<String>,
    /// Enrichment output and extras
    pub metadata: ItemMetadata,
    /// Who added the item
    pub uploader: String,
    /// Language code of the original material
    pub original_language: Option<String>,
    /// Whether access is restricted
    pub is_sensitive: bool,
    /// Unix seconds
    pub created_at: u64,
    /// When the material dates from
    pub date: Option<FuzzyDate>,
    /// Attached taxonomy values
    pub facets: Vec<Facet>,
}

impl ArchiveItem {
    /// Create an item with only the required fields set
    pub fn new(
        title: impl Into<String>,
        item_type: ItemType,
        uploader: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: ItemId::new(),
            title: title.into(),
            description: None,
            item_type,
            file_name: None,
            file_size: None,
            mime_type: None,
            sha256_hash: None,
            content_text: None,
            tags: Vec::new(),
            metadata: ItemMetadata::default(),
            uploader: uploader.into(),
            original_language: None,
            is_sensitive: false,
            created_at,
            date: None,
            facets: Vec::new(),
        }
    }

    /// Set the date
    pub fn with_date(mut self, date: FuzzyDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the tags (normalized)
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Rendered date, if the item is dated
    pub fn display_date(&self) -> Option<String> {
        self.date.as_ref().map(FuzzyDate::render)
    }

    /// Whether any tag matches one of `wanted`, ignoring case
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        self.tags
            .iter()
            .any(|tag| wanted.iter().any(|w| w.to_lowercase() == tag.to_lowercase()))
    }

    /// Whether any attached facet id is in `wanted`
    pub fn has_any_facet(&self, wanted: &[i64]) -> bool {
        self.facets.iter().any(|f| wanted.contains(&f.id))
    }

    /// Wrap for clustering; `None` when the item has no date
    pub fn into_dated(self) -> Option<DatedItem> {
        DatedItem::new(self)
    }
}

/// An archive item known to carry a date
#[derive(Debug, Clone, PartialEq)]
pub struct DatedItem {
    item: ArchiveItem,
    date: FuzzyDate,
}

impl DatedItem {
    /// Wrap `item`, or `None` when it has no date
    pub fn new(item: ArchiveItem) -> Option<Self> {
        let date = item.date.clone()?;
        Some(Self { item, date })
    }

    /// Unwrap the item
    pub fn into_inner(self) -> ArchiveItem {
        self.item
    }
}

impl Deref for DatedItem {
    type Target = ArchiveItem;

    fn deref(&self) -> &ArchiveItem {
        &self.item
    }
}

impl Dated for DatedItem {
    fn fuzzy_date(&self) -> &FuzzyDate {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_item_id_display_and_parse() {
        let id = ItemId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(ItemId::from_string(&s).unwrap(), id);
        assert_eq!(id.short().len(), 8);
        assert!(ItemId::from_string("nope").is_err());
    }

    #[test]
    fn test_item_id_chronological() {
        let a = ItemId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = ItemId::new();
        assert!(a < b);
    }

    #[test]
    fn test_item_id_serde_as_string() {
        let id = ItemId::from_value(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_item_type_from_mime() {
        assert_eq!(ItemType::from_mime("image/png"), ItemType::Photo);
        assert_eq!(ItemType::from_mime("text/plain"), ItemType::Text);
        assert_eq!(ItemType::from_mime("application/pdf"), ItemType::Document);
        assert_eq!(ItemType::from_mime("application/zip"), ItemType::Archive);
        assert_eq!(ItemType::from_mime("video/mp4"), ItemType::Other);
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("letter.PDF"), Some("application/pdf"));
        assert_eq!(guess_mime("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(guess_mime("notes.txt"), Some("text/plain"));
        assert_eq!(guess_mime("README"), None);
        assert_eq!(guess_mime("data.xyz"), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["  WW2 ", "letters", "ww2", "", "Letters", "army"]);
        assert_eq!(tags, vec!["WW2", "letters", "army"]);
    }

    #[test]
    fn test_tag_and_facet_matching() {
        let item = ArchiveItem::new("Letter", ItemType::Document, "ana", 0).with_tags(["Army", "letters"]);
        assert!(item.has_any_tag(&["army".to_string()]));
        assert!(!item.has_any_tag(&["navy".to_string()]));
        assert!(!item.has_any_facet(&[1]));
    }

    #[test]
    fn test_dated_wrapper() {
        let undated = ArchiveItem::new("Letter", ItemType::Document, "ana", 0);
        assert!(undated.clone().into_dated().is_none());

        let date = FuzzyDate::exact(NaiveDate::from_ymd_opt(1944, 6, 6).unwrap());
        let dated = undated.with_date(date.clone()).into_dated().unwrap();
        assert_eq!(dated.fuzzy_date(), &date);
        assert_eq!(dated.title, "Letter");
        assert_eq!(dated.display_date().as_deref(), Some("June 6, 1944"));
    }
}
