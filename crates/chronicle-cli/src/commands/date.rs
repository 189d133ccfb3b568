//! Date command implementation.

use crate::cli::{DateAction, DateArgs, DateCommand};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::{parse_iso_date, DatePrecision, FuzzyDate};
use chronicle_store::SqliteStore;
use serde_json::json;

/// Execute the date command.
pub fn execute_date(cmd: DateCommand, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    match cmd.action {
        DateAction::Set { id, date } => {
            let id = super::parse_item_id(&id)?;
            let date = build_date(&date)?
                .ok_or_else(|| CliError::InvalidInput("Give --date or --from".to_string()))?;
            store.set_item_date(id, &date)?;

            match formatter.format() {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "id": id, "date": date, "display": date.render() }))?
                ),
                OutputFormat::Quiet => println!("{}", id),
                OutputFormat::Table => {
                    println!("{}", formatter.success(&format!("Date of {} set to {}", id, date)))
                }
            }
        }
        DateAction::Render { date } => {
            let date = build_date(&date)?
                .ok_or_else(|| CliError::InvalidInput("Give --date or --from".to_string()))?;
            match formatter.format() {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "date": date, "display": date.render() }))?
                ),
                _ => println!("{}", date.render()),
            }
        }
    }

    Ok(())
}

/// Build a fuzzy date from command-line options.
///
/// `--date` gives a single day; `--from`/`--to` give a period whose precision
/// is inferred from its bounds unless `--precision` is set. Returns `None`
/// when no date options were given.
pub fn build_date(args: &DateArgs) -> Result<Option<FuzzyDate>> {
    let (start, end, inferred) = match (&args.date, &args.from) {
        (Some(date), _) => {
            let day = parse_iso_date(date)?;
            (day, day, DatePrecision::Day)
        }
        (None, Some(from)) => {
            let start = parse_iso_date(from)?;
            let end = args.to.as_deref().map(parse_iso_date).transpose()?.unwrap_or(start);
            (start, end, DatePrecision::infer(start, end))
        }
        (None, None) => {
            if args.approximate || args.precision.is_some() || args.display.is_some() {
                return Err(CliError::InvalidInput(
                    "--approximate, --precision and --display need --date or --from".to_string(),
                ));
            }
            return Ok(None);
        }
    };

    let precision = match args.precision.as_deref() {
        Some(p) => DatePrecision::parse(p)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown precision '{}'", p)))?,
        None => inferred,
    };

    let display = args.display.clone().filter(|d| !d.trim().is_empty());
    let date = FuzzyDate::new(start, end, args.approximate, Some(precision))?.with_display_date(display);
    Ok(Some(date))
}
