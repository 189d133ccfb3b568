//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chronicle_domain::facet::group_by_category;
use chronicle_domain::item::format_file_size;
use chronicle_domain::{
    ArchiveItem, CitationStyle, Clusters, DatedItem, Facet, TagUsage, Translation,
};
use colored::*;
use serde_json::json;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const MAX_TITLES_PER_PERIOD: usize = 3;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of items.
    pub fn format_items(&self, items: &[ArchiveItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Quiet => Ok(items
                .iter()
                .map(|i| i.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if items.is_empty() {
                    return Ok(self.colorize("No items found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Title", "Type", "Date", "Tags"]);
                for item in items {
                    builder.push_record([
                        item.id.short(),
                        item.title.clone(),
                        item.item_type.to_string(),
                        item.display_date().unwrap_or_else(|| "-".to_string()),
                        item.tags.join(", "),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format one item with its translations.
    pub fn format_item(&self, item: &ArchiveItem, translations: &[Translation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "item": item,
                "displayDate": item.display_date(),
                "translations": translations,
            }))?),
            OutputFormat::Quiet => Ok(item.id.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID".to_string(), item.id.to_string()]);
                builder.push_record(["Title".to_string(), item.title.clone()]);
                builder.push_record(["Type".to_string(), item.item_type.to_string()]);
                if let Some(date) = item.display_date() {
                    builder.push_record(["Date".to_string(), date]);
                }
                if let Some(description) = &item.description {
                    builder.push_record(["Description".to_string(), description.clone()]);
                }
                if let Some(file_name) = &item.file_name {
                    let size = item.file_size.map(format_file_size).unwrap_or_default();
                    builder.push_record(["File".to_string(), format!("{} ({})", file_name, size)]);
                }
                if !item.tags.is_empty() {
                    builder.push_record(["Tags".to_string(), item.tags.join(", ")]);
                }
                if !item.facets.is_empty() {
                    let facets: Vec<String> = item
                        .facets
                        .iter()
                        .map(|f| format!("{}: {}", f.category, f.value))
                        .collect();
                    builder.push_record(["Facets".to_string(), facets.join("\n")]);
                }
                if let Some(language) = &item.original_language {
                    builder.push_record(["Language".to_string(), language.clone()]);
                }
                builder.push_record(["Uploader".to_string(), item.uploader.clone()]);
                if item.is_sensitive {
                    builder.push_record(["Sensitive".to_string(), "yes".to_string()]);
                }
                builder.push_record(["Translations".to_string(), translations.len().to_string()]);
                Ok(render(builder))
            }
        }
    }

    /// Format timeline buckets in their current order.
    pub fn format_timeline(&self, clusters: &Clusters<DatedItem>, undated: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let periods: Vec<_> = clusters
                    .iter()
                    .map(|bucket| {
                        let items: Vec<_> = bucket
                            .items()
                            .iter()
                            .map(|item| {
                                json!({
                                    "id": item.id,
                                    "title": item.title,
                                    "date": item.display_date(),
                                })
                            })
                            .collect();
                        json!({
                            "period": bucket.label(),
                            "count": items.len(),
                            "items": items,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "level": clusters.level(),
                    "periods": periods,
                    "undated": undated,
                }))?)
            }
            OutputFormat::Quiet => Ok(clusters.labels().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if clusters.is_empty() {
                    return Ok(self.colorize("No dated items found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Period", "Items", "Titles"]);
                for bucket in clusters.iter() {
                    let mut titles: Vec<&str> = bucket
                        .items()
                        .iter()
                        .take(MAX_TITLES_PER_PERIOD)
                        .map(|item| item.title.as_str())
                        .collect();
                    if bucket.items().len() > MAX_TITLES_PER_PERIOD {
                        titles.push("...");
                    }
                    builder.push_record([
                        bucket.label().to_string(),
                        bucket.items().len().to_string(),
                        titles.join("\n"),
                    ]);
                }

                let mut output = format!(
                    "{} ({} items)\n{}",
                    self.colorize(&format!("Timeline by {}", clusters.level()), "cyan"),
                    clusters.item_count(),
                    render(builder)
                );
                if undated > 0 {
                    output.push('\n');
                    output.push_str(&self.info(&format!("{} undated item(s) not shown", undated)));
                }
                Ok(output)
            }
        }
    }

    /// Format citations keyed by style.
    pub fn format_citations(&self, citations: &BTreeMap<CitationStyle, String>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let by_name: BTreeMap<&str, &String> =
                    citations.iter().map(|(style, text)| (style.as_str(), text)).collect();
                Ok(serde_json::to_string_pretty(&by_name)?)
            }
            OutputFormat::Quiet => Ok(citations.values().cloned().collect::<Vec<_>>().join("\n\n")),
            OutputFormat::Table => {
                let sections: Vec<String> = citations
                    .iter()
                    .map(|(style, text)| {
                        format!("{}\n{}", self.colorize(&style.to_string(), "cyan"), text)
                    })
                    .collect();
                Ok(sections.join("\n\n"))
            }
        }
    }

    /// Format facets grouped by category.
    pub fn format_facets(&self, facets: &[Facet]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&group_by_category(facets))?),
            OutputFormat::Quiet => Ok(facets
                .iter()
                .map(|f| f.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if facets.is_empty() {
                    return Ok(self.colorize(
                        "No facets found. Run 'chronicle facets seed' first.",
                        "yellow",
                    ));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Category", "Value", "Slug", "Required"]);
                for (category, group) in group_by_category(facets) {
                    for facet in group {
                        builder.push_record([
                            facet.id.to_string(),
                            category.to_string(),
                            facet.value,
                            facet.slug,
                            if facet.is_required { "yes" } else { "" }.to_string(),
                        ]);
                    }
                }
                Ok(render(builder))
            }
        }
    }

    /// Format tag usage.
    pub fn format_tags(&self, tags: &[TagUsage]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(tags)?),
            OutputFormat::Quiet => Ok(tags
                .iter()
                .map(|t| t.name.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if tags.is_empty() {
                    return Ok(self.colorize("No tags found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Tag", "Slug", "Uses"]);
                for tag in tags {
                    builder.push_record([tag.name.clone(), tag.slug.clone(), tag.usage_count.to_string()]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format translations in the order given.
    pub fn format_translations(&self, translations: &[Translation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(translations)?),
            OutputFormat::Quiet => Ok(translations
                .iter()
                .map(|t| t.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if translations.is_empty() {
                    return Ok(self.colorize("No translations found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Language", "Author", "Status", "Votes", "Text"]);
                for t in translations {
                    builder.push_record([
                        t.id.to_string(),
                        t.language_code.clone(),
                        format!("{} ({})", t.author, t.author_type.as_str()),
                        t.status.as_str().to_string(),
                        format!("+{} / -{}", t.upvotes, t.downvotes),
                        preview(&t.content, 60),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a single translation after a change.
    pub fn format_translation(&self, translation: &Translation) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(translation)?),
            OutputFormat::Quiet => Ok(translation.id.to_string()),
            OutputFormat::Table => Ok(self.success(&format!(
                "Translation {} now at +{} / -{}",
                translation.id, translation.upvotes, translation.downvotes
            ))),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// First `max_chars` characters on one line, with an ellipsis when cut
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
