//! Add command implementation.

use crate::cli::AddArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronicle_domain::item::{guess_mime, normalize_tags};
use chronicle_domain::traits::{ArchiveStore, LlmProvider};
use chronicle_domain::{ArchiveItem, AuthorType, ItemType, NewTranslation, TranslationStatus};
use chronicle_enricher::{Enricher, EnrichmentRequest, EnrichmentResult};
use chronicle_llm::OllamaProvider;
use chronicle_store::SqliteStore;
use sha2::{Digest, Sha256};
use std::fs;
use tracing::debug;

/// Execute the add command.
pub async fn execute_add(
    args: AddArgs,
    store: &mut SqliteStore,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let mut item = build_item(&args, config, super::now_secs())?;

    if let Some(hash) = &item.sha256_hash {
        if let Some(existing) = store.find_by_hash(hash)? {
            return Err(CliError::Duplicate(format!(
                "File already archived as '{}' ({})",
                existing.title, existing.id
            )));
        }
    }

    let mut enrichment = None;
    if args.enrich {
        let provider = OllamaProvider::from_config(&config.llm)?;
        let enricher = Enricher::new(provider, config.enricher.clone())?;
        enrichment = enrich_item(&mut item, &enricher, store).await?;
    }

    let translations: Vec<NewTranslation> = enrichment
        .as_ref()
        .and_then(|e| e.translation.clone())
        .into_iter()
        .collect();
    let id = store.archive_item(&item, &translations)?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&item)?),
        OutputFormat::Quiet => println!("{}", id),
        OutputFormat::Table => {
            println!("{}", formatter.success(&format!("Archived '{}' as {}", item.title, id)));
            if let Some(enrichment) = &enrichment {
                for failure in &enrichment.result.failures {
                    println!(
                        "{}",
                        formatter.warning(&format!("AI {} skipped: {}", failure.stage, failure.reason))
                    );
                }
            }
        }
    }

    Ok(())
}

/// Build an item from the command-line arguments, reading the file if given.
pub fn build_item(args: &AddArgs, config: &Config, now: u64) -> Result<ArchiveItem> {
    let title = args.title.trim();
    if title.is_empty() {
        return Err(CliError::InvalidInput("Title is empty".to_string()));
    }

    let uploader = args.uploader.clone().unwrap_or_else(|| config.uploader.clone());
    let mut item = ArchiveItem::new(title, ItemType::Other, uploader, now).with_tags(&args.tags);
    item.description = args
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    if let Some(path) = &args.file {
        let bytes = fs::read(path)?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        let mime = file_name.as_deref().and_then(guess_mime);
        debug!(path = %path.display(), size = bytes.len(), ?mime, "read file");

        item.sha256_hash = Some(sha256_hex(&bytes));
        item.file_size = Some(bytes.len() as u64);
        item.item_type = mime.map(ItemType::from_mime).unwrap_or(ItemType::Other);
        if mime.is_some_and(|m| m.starts_with("text/")) {
            item.content_text = Some(String::from_utf8_lossy(&bytes).into_owned());
        }
        item.mime_type = mime.map(str::to_string);
        item.file_name = file_name;
    }

    if let Some(item_type) = &args.item_type {
        item.item_type = super::parse_item_type(item_type)?;
    }

    if let Some(date) = super::date::build_date(&args.date)? {
        item = item.with_date(date);
    }

    Ok(item)
}

/// Hex-encoded SHA-256 of `bytes`
fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Outcome of enriching an item before it is stored
#[derive(Debug)]
pub struct Enrichment {
    /// Raw pipeline output
    pub result: EnrichmentResult,
    /// AI translation ready to store once the item exists
    pub translation: Option<NewTranslation>,
}

/// Run the enrichment pipeline over an item's text and fold the suggestions in.
///
/// Returns `None` when the item has no text.
pub async fn enrich_item<L>(
    item: &mut ArchiveItem,
    enricher: &Enricher<L>,
    store: &mut SqliteStore,
) -> Result<Option<Enrichment>>
where
    L: LlmProvider + Send + Sync + 'static,
{
    let Some(content_text) = item.content_text.clone().filter(|t| !t.trim().is_empty()) else {
        debug!(title = %item.title, "no text to enrich");
        return Ok(None);
    };

    let request = EnrichmentRequest {
        title: item.title.clone(),
        file_name: item.file_name.clone(),
        content_text,
    };
    let result = enricher.enrich(&request).await;
    apply_enrichment(item, &result, store)?;

    let translation = result.translation.clone().map(|content| NewTranslation {
        item_id: item.id,
        language_code: enricher.config().target_language.clone(),
        author: enricher.model_name().to_string(),
        author_type: AuthorType::Ai,
        content,
        status: TranslationStatus::Draft,
        created_at: item.created_at,
    });

    Ok(Some(Enrichment {
        result,
        translation,
    }))
}

/// Merge AI suggestions into an item that has not been stored yet
///
/// User tags come first; suggested facets are linked only when they match the
/// taxonomy, which is seeded on first use.
pub fn apply_enrichment(
    item: &mut ArchiveItem,
    result: &EnrichmentResult,
    store: &mut SqliteStore,
) -> Result<()> {
    item.tags = normalize_tags(item.tags.iter().chain(result.tags.iter()));

    let suggested = result.item_metadata();
    item.metadata.ai_generated_tags = suggested.ai_generated_tags;
    item.metadata.ai_suggested_facets = suggested.ai_suggested_facets;

    if !result.facets.is_empty() {
        store.seed_default_facets()?;
    }
    for (category, value) in result.facets.values() {
        match store.find_facet_by_value(category, value)? {
            Some(facet) if !item.facets.contains(&facet) => item.facets.push(facet),
            Some(_) => {}
            None => debug!(%category, value, "suggested facet not in taxonomy"),
        }
    }

    if item.original_language.is_none() {
        item.original_language = result.facets.language.clone();
    }
    item.is_sensitive |= result.facets.is_sensitive();
    Ok(())
}
