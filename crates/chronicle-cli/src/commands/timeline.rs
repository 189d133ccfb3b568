//! Timeline command implementation.

use crate::cli::TimelineArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chronicle_domain::timeline::auto_cluster_level_for;
use chronicle_domain::traits::ArchiveStore;
use chronicle_domain::{
    cluster_by_period, parse_iso_date, ArchiveItem, Clusters, DatedItem, SortOrder, TimeCluster,
    TimelineQuery,
};
use chronicle_store::SqliteStore;
use tracing::debug;

/// Execute the timeline command.
pub fn execute_timeline(args: TimelineArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let query = timeline_query(&args)?;
    let (clusters, undated) = build_timeline(store, &query, &args.level)?;
    println!("{}", formatter.format_timeline(&clusters, undated)?);
    Ok(())
}

/// Translate command-line filters into a store query.
pub fn timeline_query(args: &TimelineArgs) -> Result<TimelineQuery> {
    let start = args.from.as_deref().map(parse_iso_date).transpose()?;
    let end = args.to.as_deref().map(parse_iso_date).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CliError::InvalidInput(format!(
                "--from {} is after --to {}",
                start, end
            )));
        }
    }

    Ok(TimelineQuery {
        start,
        end,
        tags: super::clean_list(&args.tags),
        facet_ids: args.facets.clone(),
        item_type: args.item_type.as_deref().map(super::parse_item_type).transpose()?,
        sort: args.sort.parse::<SortOrder>().map_err(CliError::InvalidInput)?,
        limit: args.limit,
    })
}

/// Query the store and group dated items into periods.
///
/// Returns the clusters, sorted by period in the query's order, and the
/// number of matching items that had no date.
pub fn build_timeline(
    store: &SqliteStore,
    query: &TimelineQuery,
    level: &str,
) -> Result<(Clusters<DatedItem>, usize)> {
    let items = store.timeline_items(query)?;
    let total = items.len();
    let dated: Vec<DatedItem> = items.into_iter().filter_map(ArchiveItem::into_dated).collect();
    let undated = total - dated.len();

    let level = resolve_level(level, &dated)?;
    debug!(%level, dated = dated.len(), undated, "clustering timeline");

    let mut clusters = cluster_by_period(dated, level);
    clusters.sort_by_period(query.sort);
    Ok((clusters, undated))
}

/// Named level, or the one fitting the items' date span for `auto`
fn resolve_level(level: &str, items: &[DatedItem]) -> Result<TimeCluster> {
    if level.eq_ignore_ascii_case("auto") {
        return Ok(auto_cluster_level_for(items).unwrap_or(TimeCluster::Year));
    }
    TimeCluster::parse(level).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unknown level '{}'. Use auto, era, century, decade, year or month",
            level
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chronicle_domain::{FuzzyDate, ItemType};

    fn args() -> TimelineArgs {
        TimelineArgs {
            level: "auto".to_string(),
            from: None,
            to: None,
            tags: Vec::new(),
            facets: Vec::new(),
            item_type: None,
            sort: "asc".to_string(),
            limit: None,
        }
    }

    fn store_with(years: &[(&str, Option<i32>)]) -> SqliteStore {
        let mut store = SqliteStore::new(":memory:").unwrap();
        for (title, year) in years {
            let mut item = ArchiveItem::new(*title, ItemType::Document, "ayse", 0);
            if let Some(year) = year {
                item = item.with_date(FuzzyDate::exact(NaiveDate::from_ymd_opt(*year, 1, 1).unwrap()));
            }
            store.insert_item(&item).unwrap();
        }
        store
    }

    #[test]
    fn test_auto_level_spanning_centuries() {
        let store = store_with(&[("a", Some(1800)), ("b", Some(1960)), ("c", Some(2020)), ("d", None)]);
        let query = timeline_query(&args()).unwrap();

        let (clusters, undated) = build_timeline(&store, &query, "auto").unwrap();
        assert_eq!(clusters.level(), TimeCluster::Century);
        assert_eq!(clusters.item_count(), 3);
        assert_eq!(undated, 1);
    }

    #[test]
    fn test_era_buckets_in_numeric_order() {
        let store = store_with(&[("late", Some(1050)), ("early", Some(950))]);
        let query = timeline_query(&args()).unwrap();

        let (clusters, _) = build_timeline(&store, &query, "era").unwrap();
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["900-999", "1000-1099"]);
    }

    #[test]
    fn test_descending_order() {
        let store = store_with(&[("a", Some(1912)), ("b", Some(1945)), ("c", Some(1931))]);
        let mut args = args();
        args.sort = "desc".to_string();
        let query = timeline_query(&args).unwrap();

        let (clusters, _) = build_timeline(&store, &query, "decade").unwrap();
        assert_eq!(
            clusters.labels().collect::<Vec<_>>(),
            vec!["1940s", "1930s", "1910s"]
        );
    }

    #[test]
    fn test_range_excludes_undated() {
        let store = store_with(&[("in", Some(1915)), ("out", Some(1990)), ("undated", None)]);
        let mut args = args();
        args.from = Some("1910-01-01".to_string());
        args.to = Some("1919-12-31".to_string());
        let query = timeline_query(&args).unwrap();

        let (clusters, undated) = build_timeline(&store, &query, "year").unwrap();
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["1915"]);
        assert_eq!(undated, 0);
    }

    #[test]
    fn test_empty_store() {
        let store = SqliteStore::new(":memory:").unwrap();
        let query = timeline_query(&args()).unwrap();
        let (clusters, undated) = build_timeline(&store, &query, "auto").unwrap();
        assert!(clusters.is_empty());
        assert_eq!(undated, 0);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut bad_sort = args();
        bad_sort.sort = "sideways".to_string();
        assert!(timeline_query(&bad_sort).is_err());

        let mut inverted = args();
        inverted.from = Some("2000-01-01".to_string());
        inverted.to = Some("1990-01-01".to_string());
        assert!(matches!(timeline_query(&inverted), Err(CliError::InvalidInput(_))));

        assert!(resolve_level("fortnight", &[]).is_err());
    }
}
