//! Facet and tag commands.

use crate::cli::{FacetsAction, FacetsCommand, TagsArgs};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::FacetCategory;
use chronicle_store::SqliteStore;

/// Execute the facets command.
pub fn execute_facets(cmd: FacetsCommand, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    match cmd.action {
        FacetsAction::List { category } => {
            let category = category
                .as_deref()
                .map(|c| c.parse::<FacetCategory>().map_err(CliError::InvalidInput))
                .transpose()?;
            let facets = store.list_facets(category)?;
            println!("{}", formatter.format_facets(&facets)?);
        }
        FacetsAction::Seed => {
            let inserted = store.seed_default_facets()?;
            match formatter.format() {
                OutputFormat::Json => println!("{{\"inserted\": {}}}", inserted),
                OutputFormat::Quiet => println!("{}", inserted),
                OutputFormat::Table if inserted == 0 => {
                    println!("{}", formatter.info("Facets already present, nothing seeded"))
                }
                OutputFormat::Table => {
                    println!("{}", formatter.success(&format!("Seeded {} facet(s)", inserted)))
                }
            }
        }
    }
    Ok(())
}

/// Execute the tags command.
pub fn execute_tags(args: TagsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let tags = store.list_tags(args.limit)?;
    println!("{}", formatter.format_tags(&tags)?);
    Ok(())
}
