//! Prompts for tags, facet suggestions and translation

use chronicle_domain::facet::{default_facets, NewFacet};
use chronicle_domain::FacetCategory;

/// First `max_chars` characters of `text`
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Ask for 3-5 comma-separated tags
pub fn tag_prompt(content: &str, max_chars: usize) -> String {
    format!(
        "Analyze the following document content and suggest 3-5 relevant, concise tags that categorize it.\n\
         Return ONLY a comma-separated list of tags, nothing else.\n\n\
         Document content:\n{}",
        truncate_chars(content, max_chars)
    )
}

/// Builds the facet suggestion prompt
pub struct FacetPromptBuilder<'a> {
    title: &'a str,
    file_name: Option<&'a str>,
    content: &'a str,
    catalogue: Vec<NewFacet>,
}

impl<'a> FacetPromptBuilder<'a> {
    /// Create a builder over the default catalogue
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self {
            title,
            file_name: None,
            content,
            catalogue: default_facets(),
        }
    }

    /// Mention the file name
    pub fn with_file_name(mut self, file_name: Option<&'a str>) -> Self {
        self.file_name = file_name;
        self
    }

    /// Build the prompt, sending at most `max_chars` of content
    pub fn build(&self, max_chars: usize) -> String {
        let mut prompt = String::new();

        prompt.push_str(FACET_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Allowed values (use the slug):\n");
        for category in FacetCategory::ALL {
            let slugs: Vec<&str> = self
                .catalogue
                .iter()
                .filter(|f| f.category == category)
                .map(|f| f.slug.as_str())
                .collect();
            prompt.push_str(&format!("- {}: {}\n", json_key(category), slugs.join(", ")));
        }
        prompt.push('\n');

        prompt.push_str(&format!("Title: {}\n", self.title));
        if let Some(file_name) = self.file_name {
            prompt.push_str(&format!("File name: {}\n", file_name));
        }
        prompt.push_str("Content:\n---\n");
        prompt.push_str(truncate_chars(self.content, max_chars));
        prompt.push_str("\n---\n\n");

        prompt.push_str(FACET_OUTPUT_FORMAT);
        prompt
    }
}

/// Key used for a category in the JSON answer
pub(crate) fn json_key(category: FacetCategory) -> &'static str {
    match category {
        FacetCategory::SourceType => "sourceType",
        other => other.as_str(),
    }
}

/// Ask for a translation from `source_language` into `target_language`
pub fn translation_prompt(
    content: &str,
    source_language: &str,
    target_language: &str,
    max_chars: usize,
) -> String {
    format!(
        "Translate the following text from language code \"{}\" into language code \"{}\".\n\
         Preserve names, dates and line breaks. Return ONLY the translation.\n\n\
         Text:\n{}",
        source_language,
        target_language,
        truncate_chars(content, max_chars)
    )
}

const FACET_INSTRUCTIONS: &str = "You are cataloguing an item for a historical archive.
Classify it using the fixed taxonomy below.

Rules:
- era, location and subject may list several slugs
- sourceType, language and sensitivity take exactly one slug
- language is the language of the original content
- Leave a field out when the content gives no evidence for it";

const FACET_OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{
  "era": ["slug"],
  "location": ["slug"],
  "subject": ["slug"],
  "sourceType": "slug",
  "language": "slug",
  "sensitivity": "slug"
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_tag_prompt_truncates_content() {
        let content = "x".repeat(6_000);
        let prompt = tag_prompt(&content, 5_000);
        assert!(prompt.contains("comma-separated list of tags"));
        assert_eq!(prompt.matches('x').count(), 5_000);
    }

    #[test]
    fn test_facet_prompt_lists_catalogue() {
        let prompt = FacetPromptBuilder::new("Harbour letter", "Dear sir")
            .with_file_name(Some("letter.txt"))
            .build(100);
        assert!(prompt.contains("Title: Harbour letter"));
        assert!(prompt.contains("File name: letter.txt"));
        assert!(prompt.contains("- sourceType: government, military-doc"));
        assert!(prompt.contains("ww2"));
        assert!(prompt.contains("Dear sir"));
        assert!(prompt.contains("JSON object only"));
    }

    #[test]
    fn test_facet_prompt_without_file_name() {
        let prompt = FacetPromptBuilder::new("Untitled", "text").build(100);
        assert!(!prompt.contains("File name:"));
    }

    #[test]
    fn test_translation_prompt() {
        let prompt = translation_prompt("Merhaba", "tr", "en", 100);
        assert!(prompt.contains("\"tr\" into language code \"en\""));
        assert!(prompt.ends_with("Merhaba"));
    }
}
