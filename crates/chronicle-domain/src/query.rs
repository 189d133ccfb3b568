//! Query criteria for listing and timeline views

use crate::item::{ArchiveItem, ItemType};
use crate::timeline::SortOrder;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Paged listing of items, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    /// Filter by item type
    pub item_type: Option<ItemType>,

    /// Filter by tag (case-insensitive)
    pub tag: Option<String>,

    /// Maximum results to return
    pub limit: Option<usize>,

    /// Results to skip
    pub offset: usize,
}

/// Filters applied to the timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineQuery {
    /// Keep items whose date ends on or after this day
    pub start: Option<NaiveDate>,

    /// Keep items whose date starts on or before this day
    pub end: Option<NaiveDate>,

    /// Keep items carrying any of these tags
    pub tags: Vec<String>,

    /// Keep items attached to any of these facets
    pub facet_ids: Vec<i64>,

    /// Filter by item type
    pub item_type: Option<ItemType>,

    /// Order by date
    pub sort: SortOrder,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl TimelineQuery {
    /// Whether a date range was requested
    pub fn has_range(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Check a single item against every filter
    ///
    /// With a date range set, undated items never match.
    pub fn matches(&self, item: &ArchiveItem) -> bool {
        if self.has_range() {
            match &item.date {
                Some(date) if date.overlaps(self.start, self.end) => {}
                _ => return false,
            }
        }

        if !self.tags.is_empty() && !item.has_any_tag(&self.tags) {
            return false;
        }

        if !self.facet_ids.is_empty() && !item.has_any_facet(&self.facet_ids) {
            return false;
        }

        if self.item_type.is_some_and(|t| t != item.item_type) {
            return false;
        }

        true
    }

    /// Filter, sort and truncate
    ///
    /// Items sort on the start of their date. Undated items sort on the day
    /// they were created. Ties keep their input order.
    pub fn apply(&self, items: Vec<ArchiveItem>) -> Vec<ArchiveItem> {
        let mut kept: Vec<(NaiveDate, ArchiveItem)> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .map(|item| (sort_date(&item), item))
            .collect();

        match self.sort {
            SortOrder::Asc => kept.sort_by(|a, b| a.0.cmp(&b.0)),
            SortOrder::Desc => kept.sort_by(|a, b| b.0.cmp(&a.0)),
        }

        let limit = self.limit.unwrap_or(usize::MAX);
        kept.into_iter().take(limit).map(|(_, item)| item).collect()
    }
}

fn sort_date(item: &ArchiveItem) -> NaiveDate {
    match &item.date {
        Some(date) => date.date_start(),
        None => created_on(item.created_at),
    }
}

fn created_on(created_at: u64) -> NaiveDate {
    i64::try_from(created_at)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}
