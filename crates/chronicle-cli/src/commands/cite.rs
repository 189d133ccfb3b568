//! Cite command implementation.

use crate::cli::CiteArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::NaiveDate;
use chronicle_domain::citation;
use chronicle_domain::{CitationData, CitationStyle};
use chronicle_store::SqliteStore;
use std::collections::BTreeMap;

/// Execute the cite command.
pub fn execute_cite(
    args: CiteArgs,
    store: &SqliteStore,
    config: &Config,
    formatter: &Formatter,
    today: NaiveDate,
) -> Result<()> {
    let item = super::load_item(store, &args.id)?;
    let data = CitationData::from_item(&item, Some(&config.archive_name), args.url.as_deref(), today);
    let citations = citations_for(&data, &args.style)?;
    println!("{}", formatter.format_citations(&citations)?);
    Ok(())
}

/// Citations in the requested style, or in every style for `all`.
pub fn citations_for(data: &CitationData, style: &str) -> Result<BTreeMap<CitationStyle, String>> {
    if style.eq_ignore_ascii_case("all") {
        return Ok(citation::all(data));
    }

    let style: CitationStyle = style.parse().map_err(CliError::InvalidInput)?;
    Ok(BTreeMap::from([(style, citation::format(data, style))]))
}
