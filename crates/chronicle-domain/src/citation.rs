//! Citation formatting for archive items
//!
//! Produces APA, MLA, Chicago, BibTeX and plain text citations from a
//! [`CitationData`] record. The access date is always supplied by the caller.

use crate::fuzzy_date::format_long_date;
use crate::item::ArchiveItem;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Supported citation styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// APA 7th edition
    Apa,
    /// MLA 9th edition
    Mla,
    /// Chicago 17th edition, bibliography form
    Chicago,
    /// BibTeX `@misc` entry
    Bibtex,
    /// Simple human readable form
    #[serde(rename = "plaintext")]
    PlainText,
}

impl CitationStyle {
    /// All styles in display order
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Bibtex,
        CitationStyle::PlainText,
    ];

    /// Get the style as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Mla => "mla",
            CitationStyle::Chicago => "chicago",
            CitationStyle::Bibtex => "bibtex",
            CitationStyle::PlainText => "plaintext",
        }
    }

    /// Parse a style name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "apa" => Some(CitationStyle::Apa),
            "mla" => Some(CitationStyle::Mla),
            "chicago" => Some(CitationStyle::Chicago),
            "bibtex" => Some(CitationStyle::Bibtex),
            "plain" | "plaintext" | "text" => Some(CitationStyle::PlainText),
            _ => None,
        }
    }
}

impl std::str::FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown citation style '{}'", s))
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a citation can mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationData {
    /// Work title
    pub title: String,
    /// Author in "First Middle Last" order
    pub author: Option<String>,
    /// Date of the work
    pub date: Option<NaiveDate>,
    /// Where the work can be found online
    pub url: Option<String>,
    /// When the work was accessed
    pub access_date: NaiveDate,
    /// Holding archive
    pub archive_name: Option<String>,
    /// Kind of item, e.g. "Photo"
    pub item_type: Option<String>,
    /// Publisher
    pub publisher: Option<String>,
}

impl CitationData {
    /// Minimal citation data with only a title and access date
    pub fn new(title: impl Into<String>, access_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            author: None,
            date: None,
            url: None,
            access_date,
            archive_name: None,
            item_type: None,
            publisher: None,
        }
    }

    /// Build citation data for a stored item
    ///
    /// The uploader stands in as author and the start of the item's date is
    /// used as the date of the work.
    pub fn from_item(
        item: &ArchiveItem,
        archive_name: Option<&str>,
        url: Option<&str>,
        access_date: NaiveDate,
    ) -> Self {
        let author = Some(item.uploader.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let type_name = item.item_type.as_str();
        let mut chars = type_name.chars();
        let item_type = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect::<String>());

        Self {
            title: item.title.clone(),
            author,
            date: item.date.as_ref().map(|d| d.date_start()),
            url: url.map(str::to_string),
            access_date,
            archive_name: archive_name.map(str::to_string),
            item_type,
            publisher: None,
        }
    }

    fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}

/// Invert "First Middle Last" into "Last, First Middle"
pub fn invert_author(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{}, {}", last, rest.join(" ")),
    }
}

/// APA 7th edition
pub fn apa(data: &CitationData) -> String {
    let mut parts = Vec::new();

    if let Some(author) = &data.author {
        parts.push(format!("{}.", invert_author(author)));
    }

    match data.year() {
        Some(year) => parts.push(format!("({}).", year)),
        None => parts.push("(n.d.).".to_string()),
    }

    parts.push(format!("{}.", data.title));

    if let Some(archive) = &data.archive_name {
        let kind = data.item_type.as_deref().unwrap_or("Archive item");
        parts.push(format!("[{}]. {}.", kind, archive));
    }

    if let Some(url) = &data.url {
        parts.push(format!(
            "Retrieved {}, from {}",
            format_long_date(data.access_date),
            url
        ));
    }

    parts.join(" ")
}

/// MLA 9th edition
pub fn mla(data: &CitationData) -> String {
    let mut parts = Vec::new();

    if let Some(author) = &data.author {
        parts.push(format!("{}.", invert_author(author)));
    }

    parts.push(format!("\"{}.\"", data.title));

    if let Some(archive) = &data.archive_name {
        parts.push(format!("{},", archive));
    }

    if let Some(date) = data.date {
        parts.push(format!("{}.", format_long_date(date)));
    }

    if let Some(url) = &data.url {
        parts.push(format!("{}.", url));
        parts.push(format!("Accessed {}.", format_long_date(data.access_date)));
    }

    parts.join(" ")
}

/// Chicago 17th edition; the author keeps natural order
pub fn chicago(data: &CitationData) -> String {
    let mut parts = Vec::new();

    if let Some(author) = &data.author {
        parts.push(format!("{}.", author));
    }

    parts.push(format!("\"{}.\"", data.title));

    if let Some(archive) = &data.archive_name {
        parts.push(format!("{}.", archive));
    }

    if let Some(year) = data.year() {
        parts.push(format!("{}.", year));
    }

    if let Some(url) = &data.url {
        parts.push(format!("{}.", url));
    }

    parts.join(" ")
}

/// Default BibTeX key: first word of the author (or "Anonymous") plus the year (or "nd")
pub fn bibtex_key(data: &CitationData) -> String {
    let name = data
        .author
        .as_deref()
        .and_then(|a| a.split_whitespace().next())
        .unwrap_or("Anonymous");
    let year = data
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "nd".to_string());
    format!("{}{}", name, year)
}

/// BibTeX `@misc` entry
pub fn bibtex(data: &CitationData, cite_key: Option<&str>) -> String {
    let key = cite_key
        .map(str::to_string)
        .unwrap_or_else(|| bibtex_key(data));

    let mut fields = Vec::new();
    if let Some(author) = &data.author {
        fields.push(format!("  author = {{{}}}", author));
    }
    fields.push(format!("  title = {{{}}}", data.title));
    if let Some(year) = data.year() {
        fields.push(format!("  year = {{{}}}", year));
    }
    if let Some(archive) = &data.archive_name {
        fields.push(format!("  howpublished = {{{}}}", archive));
    }
    if let Some(url) = &data.url {
        fields.push(format!("  url = {{{}}}", url));
    }
    fields.push(format!(
        "  note = {{Accessed: {}}}",
        format_long_date(data.access_date)
    ));

    format!("@misc{{{},\n{}\n}}", key, fields.join(",\n"))
}

/// One-line plain text form
pub fn plain_text(data: &CitationData) -> String {
    let mut parts = vec![data.title.clone()];

    if let Some(author) = &data.author {
        parts.push(format!("by {}", author));
    }
    if let Some(year) = data.year() {
        parts.push(format!("({})", year));
    }
    if let Some(archive) = &data.archive_name {
        parts.push(format!("- {}", archive));
    }
    if let Some(url) = &data.url {
        parts.push(format!("Available at: {}", url));
    }

    parts.join(" ")
}

/// Format in a single style
pub fn format(data: &CitationData, style: CitationStyle) -> String {
    match style {
        CitationStyle::Apa => apa(data),
        CitationStyle::Mla => mla(data),
        CitationStyle::Chicago => chicago(data),
        CitationStyle::Bibtex => bibtex(data, None),
        CitationStyle::PlainText => plain_text(data),
    }
}

/// Format in every style
pub fn all(data: &CitationData) -> BTreeMap<CitationStyle, String> {
    CitationStyle::ALL
        .iter()
        .map(|style| (*style, format(data, *style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy_date::FuzzyDate;
    use crate::item::ItemType;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn letter() -> CitationData {
        CitationData {
            title: "Letter to the Harbour Board".to_string(),
            author: Some("Mary Ann Evans".to_string()),
            date: Some(d(1921, 3, 14)),
            url: Some("https://archive.example/items/42".to_string()),
            access_date: d(2024, 1, 5),
            archive_name: Some("Port Town Archive".to_string()),
            item_type: Some("Document".to_string()),
            publisher: None,
        }
    }

    #[test]
    fn test_invert_author() {
        assert_eq!(invert_author("Mary Ann Evans"), "Evans, Mary Ann");
        assert_eq!(invert_author("Plato"), "Plato");
        assert_eq!(invert_author("  "), "");
    }

    #[test]
    fn test_apa() {
        assert_eq!(
            apa(&letter()),
            "Evans, Mary Ann. (1921). Letter to the Harbour Board. [Document]. Port Town Archive. \
             Retrieved January 5, 2024, from https://archive.example/items/42"
        );
    }

    #[test]
    fn test_apa_without_date() {
        let data = CitationData::new("Untitled", d(2024, 1, 5));
        assert_eq!(apa(&data), "(n.d.). Untitled.");
    }

    #[test]
    fn test_apa_default_item_type() {
        let mut data = letter();
        data.item_type = None;
        data.url = None;
        assert!(apa(&data).ends_with("[Archive item]. Port Town Archive."));
    }

    #[test]
    fn test_mla() {
        assert_eq!(
            mla(&letter()),
            "Evans, Mary Ann. \"Letter to the Harbour Board.\" Port Town Archive, March 14, 1921. \
             https://archive.example/items/42. Accessed January 5, 2024."
        );
    }

    #[test]
    fn test_chicago() {
        assert_eq!(
            chicago(&letter()),
            "Mary Ann Evans. \"Letter to the Harbour Board.\" Port Town Archive. 1921. \
             https://archive.example/items/42."
        );
    }

    #[test]
    fn test_bibtex() {
        let entry = bibtex(&letter(), None);
        assert!(entry.starts_with("@misc{Mary1921,\n"));
        assert!(entry.contains("  author = {Mary Ann Evans},\n"));
        assert!(entry.contains("  howpublished = {Port Town Archive},\n"));
        assert!(entry.ends_with("  note = {Accessed: January 5, 2024}\n}"));
    }

    #[test]
    fn test_bibtex_key_fallbacks() {
        let data = CitationData::new("Untitled", d(2024, 1, 5));
        assert_eq!(bibtex_key(&data), "Anonymousnd");
        assert!(bibtex(&data, Some("custom")).starts_with("@misc{custom,"));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            plain_text(&letter()),
            "Letter to the Harbour Board by Mary Ann Evans (1921) - Port Town Archive \
             Available at: https://archive.example/items/42"
        );
    }

    #[test]
    fn test_all_styles() {
        let all = all(&letter());
        assert_eq!(all.len(), 5);
        assert_eq!(all[&CitationStyle::Apa], apa(&letter()));
        assert_eq!(
            all.keys().copied().collect::<Vec<_>>(),
            CitationStyle::ALL.to_vec()
        );
    }

    #[test]
    fn test_from_item() {
        let item = ArchiveItem::new("Harbour photo", ItemType::Photo, "Ana Lima", 0)
            .with_date(FuzzyDate::exact(d(1950, 6, 1)));
        let data = CitationData::from_item(&item, Some("Port Town Archive"), None, d(2024, 1, 5));
        assert_eq!(data.author.as_deref(), Some("Ana Lima"));
        assert_eq!(data.item_type.as_deref(), Some("Photo"));
        assert_eq!(data.date, Some(d(1950, 6, 1)));
        assert_eq!(bibtex_key(&data), "Ana1950");
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("plain".parse::<CitationStyle>(), Ok(CitationStyle::PlainText));
        assert_eq!("BibTeX".parse::<CitationStyle>(), Ok(CitationStyle::Bibtex));
        assert!("harvard".parse::<CitationStyle>().is_err());
    }
}
