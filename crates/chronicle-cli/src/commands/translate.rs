//! Translate command implementation.

use crate::cli::{TranslateAction, TranslateCommand};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::{AuthorType, NewTranslation, TranslationStatus, VoteType};
use chronicle_store::SqliteStore;
use std::fs;
use std::path::Path;

/// Execute the translate command.
pub fn execute_translate(
    cmd: TranslateCommand,
    store: &mut SqliteStore,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd.action {
        TranslateAction::Add {
            id,
            language,
            text,
            file,
            author,
            publish,
        } => {
            let item_id = super::parse_item_id(&id)?;
            let content = translation_text(text, file.as_deref())?;
            let language_code = language.trim().to_lowercase();
            if language_code.is_empty() {
                return Err(CliError::InvalidInput("Language code is empty".to_string()));
            }

            let translation = store.add_translation(&NewTranslation {
                item_id,
                language_code,
                author: author.unwrap_or_else(|| config.uploader.clone()),
                author_type: AuthorType::Human,
                content,
                status: if publish {
                    TranslationStatus::Published
                } else {
                    TranslationStatus::Draft
                },
                created_at: super::now_secs(),
            })?;
            println!("{}", formatter.format_translation(&translation)?);
        }
        TranslateAction::List { id, language } => {
            let item_id = super::parse_item_id(&id)?;
            let language = language.map(|l| l.trim().to_lowercase());
            let translations = store.get_translations(item_id, language.as_deref())?;
            println!("{}", formatter.format_translations(&translations)?);
        }
        TranslateAction::Vote {
            translation_id,
            vote,
            voter,
        } => {
            let vote: VoteType = vote.parse().map_err(CliError::InvalidInput)?;
            let voter = voter.unwrap_or_else(|| config.uploader.clone());
            let translation = store.vote_translation(translation_id, &voter, vote)?;
            println!("{}", formatter.format_translation(&translation)?);
        }
    }
    Ok(())
}

/// Translated text from `--text` or `--file`
fn translation_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    let content = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            return Err(CliError::InvalidInput("Give --text or --file".to_string()));
        }
    };

    let content = content.trim();
    if content.is_empty() {
        return Err(CliError::InvalidInput("Translation text is empty".to_string()));
    }
    Ok(content.to_string())
}
