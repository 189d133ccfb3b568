//! Facet module - the controlled taxonomy for archive items
//!
//! Facets are admin-curated values grouped into fixed categories. Unlike free
//! tags they are shared across the archive and some categories are mandatory
//! for moderation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Facet category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetCategory {
    /// Historical period
    Era,
    /// Geographic region
    Location,
    /// Primary topic
    Subject,
    /// Document origin
    SourceType,
    /// Original language
    Language,
    /// Access level
    Sensitivity,
}

impl FacetCategory {
    /// All categories in display order
    pub const ALL: [FacetCategory; 6] = [
        FacetCategory::Era,
        FacetCategory::Location,
        FacetCategory::Subject,
        FacetCategory::SourceType,
        FacetCategory::Language,
        FacetCategory::Sensitivity,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetCategory::Era => "era",
            FacetCategory::Location => "location",
            FacetCategory::Subject => "subject",
            FacetCategory::SourceType => "source_type",
            FacetCategory::Language => "language",
            FacetCategory::Sensitivity => "sensitivity",
        }
    }

    /// Parse a category; accepts `source_type` and `sourceType`
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "era" => Some(FacetCategory::Era),
            "location" => Some(FacetCategory::Location),
            "subject" => Some(FacetCategory::Subject),
            "source_type" | "sourcetype" => Some(FacetCategory::SourceType),
            "language" => Some(FacetCategory::Language),
            "sensitivity" => Some(FacetCategory::Sensitivity),
            _ => None,
        }
    }
}

impl std::str::FromStr for FacetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid facet category: {}", s))
    }
}

impl fmt::Display for FacetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored facet value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// Store-assigned identifier
    pub id: i64,
    /// Category this value belongs to
    pub category: FacetCategory,
    /// Display value ("World War II Era (1939-1945)")
    pub value: String,
    /// URL-safe identifier
    pub slug: String,
    /// Optional explanation
    pub description: Option<String>,
    /// Whether every item must carry a value from this category
    pub is_required: bool,
    /// Position within the category
    pub sort_order: i32,
}

/// A facet that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFacet {
    /// Category this value belongs to
    pub category: FacetCategory,
    /// Display value
    pub value: String,
    /// URL-safe identifier
    pub slug: String,
    /// Optional explanation
    pub description: Option<String>,
    /// Whether the category is mandatory
    pub is_required: bool,
    /// Position within the category
    pub sort_order: i32,
}

type FacetRow = (&'static str, &'static str, Option<&'static str>);

const ERAS: &[FacetRow] = &[
    ("Ancient History (Before 500 CE)", "ancient", Some("Before the fall of Rome")),
    ("Medieval Period (500-1500)", "medieval", Some("Middle Ages")),
    ("Early Modern (1500-1800)", "early-modern", Some("Renaissance to Enlightenment")),
    ("19th Century", "19th-century", Some("1800-1900")),
    ("World War I Era (1914-1918)", "ww1", Some("The Great War")),
    ("Interwar Period (1918-1939)", "interwar", Some("Between the World Wars")),
    ("World War II Era (1939-1945)", "ww2", Some("Second World War")),
    ("Cold War (1945-1991)", "cold-war", Some("US-Soviet tensions")),
    ("Post-Cold War (1991-2000)", "post-cold-war", Some("End of Soviet Union")),
    ("21st Century", "21st-century", Some("2000-present")),
];

const LOCATIONS: &[FacetRow] = &[
    ("Global/International", "global", Some("Worldwide or multi-regional")),
    ("North America", "north-america", None),
    ("South America", "south-america", None),
    ("Europe", "europe", None),
    ("Middle East", "middle-east", None),
    ("Africa", "africa", None),
    ("Asia", "asia", None),
    ("Oceania", "oceania", Some("Australia, Pacific Islands")),
    ("Turkey/Anatolia", "turkey", Some("Ottoman Empire, Republic of Turkey")),
];

const SUBJECTS: &[FacetRow] = &[
    ("Military/Warfare", "military", Some("Armed conflict, strategy, battles")),
    ("Politics/Government", "politics", Some("Political events, elections, policies")),
    ("Economics/Trade", "economics", Some("Financial systems, commerce")),
    ("Social/Cultural", "social", Some("Society, culture, movements")),
    ("Science/Technology", "science", Some("Scientific discoveries, innovations")),
    ("Religion/Philosophy", "religion", Some("Religious events, theological texts")),
    ("Art/Literature", "art", Some("Creative works, artistic movements")),
    ("Human Rights/Justice", "human-rights", Some("Civil rights, legal cases")),
    ("Environment/Nature", "environment", Some("Ecology, natural disasters")),
    ("Personal/Biographical", "personal", Some("Individual stories, memoirs")),
];

const SOURCE_TYPES: &[FacetRow] = &[
    ("Government Document", "government", Some("Official state records")),
    ("Military Record", "military-doc", Some("Armed forces documentation")),
    ("News Media", "news", Some("Newspapers, journalism")),
    ("Academic/Research", "academic", Some("Scholarly work, studies")),
    ("Personal Correspondence", "correspondence", Some("Letters, diaries, memoirs")),
    ("Legal Document", "legal", Some("Court records, contracts")),
    ("Organizational Record", "organizational", Some("NGO, corporate, institutional")),
    ("Photograph/Image", "photo-doc", Some("Visual documentation")),
    ("Audio/Video Recording", "media", Some("Recorded audio/visual material")),
    ("Unknown/Uncertain", "unknown", Some("Origin unclear")),
];

const LANGUAGES: &[FacetRow] = &[
    ("English", "en", None),
    ("Turkish", "tr", None),
    ("Arabic", "ar", None),
    ("German", "de", None),
    ("French", "fr", None),
    ("Russian", "ru", None),
    ("Spanish", "es", None),
    ("Chinese", "zh", None),
    ("Japanese", "ja", None),
    ("Ottoman Turkish", "ota", Some("Pre-1928 Turkish script")),
    ("Latin", "la", Some("Classical or Medieval Latin")),
    ("Multiple Languages", "multi", None),
    ("Unknown", "unknown-lang", None),
];

const SENSITIVITY: &[FacetRow] = &[
    ("Public", "public", Some("Safe for all audiences")),
    ("Sensitive Content", "sensitive", Some("Mature themes, requires warning")),
    ("Graphic/Violent", "graphic", Some("War imagery, violence (auto-blurred)")),
    ("Restricted", "restricted", Some("Admin approval required")),
];

/// The curated catalogue used to seed an empty archive
pub fn default_facets() -> Vec<NewFacet> {
    let groups: [(FacetCategory, &[FacetRow], bool); 6] = [
        (FacetCategory::Era, ERAS, false),
        (FacetCategory::Location, LOCATIONS, false),
        (FacetCategory::Subject, SUBJECTS, false),
        (FacetCategory::SourceType, SOURCE_TYPES, true),
        (FacetCategory::Language, LANGUAGES, false),
        (FacetCategory::Sensitivity, SENSITIVITY, true),
    ];

    groups
        .iter()
        .flat_map(|(category, rows, is_required)| {
            rows.iter().enumerate().map(move |(idx, (value, slug, description))| NewFacet {
                category: *category,
                value: value.to_string(),
                slug: slug.to_string(),
                description: description.map(str::to_string),
                is_required: *is_required,
                sort_order: idx as i32 + 1,
            })
        })
        .collect()
}

/// Group facets by category, each group ordered by `sort_order`
pub fn group_by_category(facets: &[Facet]) -> BTreeMap<FacetCategory, Vec<Facet>> {
    let mut grouped: BTreeMap<FacetCategory, Vec<Facet>> = BTreeMap::new();
    for facet in facets {
        grouped.entry(facet.category).or_default().push(facet.clone());
    }
    for group in grouped.values_mut() {
        group.sort_by_key(|f| f.sort_order);
    }
    grouped
}

/// Lowercase a name and join its words with `-`
pub fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Facet values chosen for an item, by category
///
/// Era, location and subject accept several values; the other categories
/// take one. Keys outside the known categories are kept in `additional`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSelection {
    /// Historical periods
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub era: Vec<String>,

    /// Regions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location: Vec<String>,

    /// Topics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject: Vec<String>,

    /// Document origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,

    /// Original language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Access level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<String>,

    /// Free-form extras
    #[serde(flatten)]
    pub additional: BTreeMap<String, Value>,
}

impl FacetSelection {
    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.values().is_empty() && self.additional.is_empty()
    }

    /// Combine two selections, preferring `primary` field by field
    ///
    /// Used to layer user choices over AI suggestions.
    pub fn merge(primary: &FacetSelection, fallback: &FacetSelection) -> FacetSelection {
        let pick = |a: &Vec<String>, b: &Vec<String>| if a.is_empty() { b.clone() } else { a.clone() };

        let mut additional = fallback.additional.clone();
        additional.extend(primary.additional.clone());

        FacetSelection {
            era: pick(&primary.era, &fallback.era),
            location: pick(&primary.location, &fallback.location),
            subject: pick(&primary.subject, &fallback.subject),
            source_type: primary.source_type.clone().or_else(|| fallback.source_type.clone()),
            language: primary.language.clone().or_else(|| fallback.language.clone()),
            sensitivity: primary.sensitivity.clone().or_else(|| fallback.sensitivity.clone()),
            additional,
        }
    }

    /// Every selected value with its category
    pub fn values(&self) -> Vec<(FacetCategory, &str)> {
        let mut values = Vec::new();
        values.extend(self.era.iter().map(|v| (FacetCategory::Era, v.as_str())));
        values.extend(self.location.iter().map(|v| (FacetCategory::Location, v.as_str())));
        values.extend(self.subject.iter().map(|v| (FacetCategory::Subject, v.as_str())));
        if let Some(v) = &self.source_type {
            values.push((FacetCategory::SourceType, v.as_str()));
        }
        if let Some(v) = &self.language {
            values.push((FacetCategory::Language, v.as_str()));
        }
        if let Some(v) = &self.sensitivity {
            values.push((FacetCategory::Sensitivity, v.as_str()));
        }
        values
    }

    /// Whether the sensitivity marks the item as restricted
    pub fn is_sensitive(&self) -> bool {
        self.sensitivity.as_deref().is_some_and(|s| {
            s.eq_ignore_ascii_case("restricted") || s.eq_ignore_ascii_case("confidential")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue_counts() {
        let facets = default_facets();
        let count = |c: FacetCategory| facets.iter().filter(|f| f.category == c).count();

        assert_eq!(count(FacetCategory::Era), 10);
        assert_eq!(count(FacetCategory::Location), 9);
        assert_eq!(count(FacetCategory::Subject), 10);
        assert_eq!(count(FacetCategory::SourceType), 10);
        assert_eq!(count(FacetCategory::Language), 13);
        assert_eq!(count(FacetCategory::Sensitivity), 4);
    }

    #[test]
    fn test_default_catalogue_required_flags() {
        for facet in default_facets() {
            let required = matches!(
                facet.category,
                FacetCategory::SourceType | FacetCategory::Sensitivity
            );
            assert_eq!(facet.is_required, required, "{}", facet.value);
        }
    }

    #[test]
    fn test_sort_order_starts_at_one() {
        let facets = default_facets();
        let first_era = facets.iter().find(|f| f.category == FacetCategory::Era).unwrap();
        assert_eq!(first_era.sort_order, 1);
        assert_eq!(first_era.slug, "ancient");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(FacetCategory::parse("sourceType"), Some(FacetCategory::SourceType));
        assert_eq!(FacetCategory::parse("source_type"), Some(FacetCategory::SourceType));
        assert_eq!("Era".parse::<FacetCategory>(), Ok(FacetCategory::Era));
        assert!(FacetCategory::parse("colour").is_none());
    }

    #[test]
    fn test_group_by_category() {
        let facet = |id, category, sort_order| Facet {
            id,
            category,
            value: format!("v{}", id),
            slug: format!("s{}", id),
            description: None,
            is_required: false,
            sort_order,
        };
        let facets = vec![
            facet(1, FacetCategory::Subject, 2),
            facet(2, FacetCategory::Era, 1),
            facet(3, FacetCategory::Subject, 1),
        ];

        let grouped = group_by_category(&facets);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![FacetCategory::Era, FacetCategory::Subject]);
        let subjects: Vec<i64> = grouped[&FacetCategory::Subject].iter().map(|f| f.id).collect();
        assert_eq!(subjects, vec![3, 1]);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("World War II"), "world-war-ii");
        assert_eq!(slugify("cold   war"), "cold-war");
        assert_eq!(slugify("letters"), "letters");
    }

    #[test]
    fn test_merge_prefers_primary() {
        let user = FacetSelection {
            era: vec!["Cold War (1945-1991)".to_string()],
            language: Some("tr".to_string()),
            ..Default::default()
        };
        let ai = FacetSelection {
            era: vec!["Interwar Period (1918-1939)".to_string()],
            subject: vec!["Politics/Government".to_string()],
            language: Some("en".to_string()),
            sensitivity: Some("Public".to_string()),
            ..Default::default()
        };

        let merged = FacetSelection::merge(&user, &ai);
        assert_eq!(merged.era, vec!["Cold War (1945-1991)"]);
        assert_eq!(merged.subject, vec!["Politics/Government"]);
        assert_eq!(merged.language.as_deref(), Some("tr"));
        assert_eq!(merged.sensitivity.as_deref(), Some("Public"));
    }

    #[test]
    fn test_values_and_sensitivity() {
        let selection = FacetSelection {
            location: vec!["Europe".to_string(), "Asia".to_string()],
            sensitivity: Some("Restricted".to_string()),
            ..Default::default()
        };
        assert_eq!(selection.values().len(), 3);
        assert!(selection.is_sensitive());
        assert!(!FacetSelection::default().is_sensitive());
        assert!(FacetSelection::default().is_empty());
    }

    #[test]
    fn test_selection_serde_keeps_additional_keys() {
        let json = r#"{"era":["ww2"],"sourceType":"News Media","confidence":"high"}"#;
        let selection: FacetSelection = serde_json::from_str(json).unwrap();
        assert_eq!(selection.era, vec!["ww2"]);
        assert_eq!(selection.source_type.as_deref(), Some("News Media"));
        assert_eq!(selection.additional["confidence"], "high");

        let back = serde_json::to_value(&selection).unwrap();
        assert_eq!(back["confidence"], "high");
        assert!(back.get("location").is_none());
    }
}
