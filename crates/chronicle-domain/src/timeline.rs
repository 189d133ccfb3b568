//! Timeline clustering
//!
//! Groups dated items into period buckets (month, year, decade, century or
//! 100-year era) for the timeline view. The granularity is either chosen by
//! the caller or derived from the span of the dates being viewed.

use crate::fuzzy_date::{
    century_label, century_number, decade_label, decade_start, era_start, format_month_year,
    FuzzyDate,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Bucket granularity for the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeCluster {
    /// 100-year spans aligned to whole hundreds ("1900-1999")
    Era,
    /// Ordinal centuries ("20th Century")
    Century,
    /// Decades ("1990s")
    Decade,
    /// Calendar years ("1995")
    Year,
    /// Calendar months ("December 1995")
    Month,
}

impl TimeCluster {
    /// Get the level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeCluster::Era => "era",
            TimeCluster::Century => "century",
            TimeCluster::Decade => "decade",
            TimeCluster::Year => "year",
            TimeCluster::Month => "month",
        }
    }

    /// Parse a level from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "era" => Some(TimeCluster::Era),
            "century" => Some(TimeCluster::Century),
            "decade" => Some(TimeCluster::Decade),
            "year" => Some(TimeCluster::Year),
            "month" => Some(TimeCluster::Month),
            _ => None,
        }
    }
}

impl std::str::FromStr for TimeCluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cluster level: {}", s))
    }
}

impl fmt::Display for TimeCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chronological display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// Anything carrying a fuzzy date can be placed on the timeline
pub trait Dated {
    /// The date used for bucketing (its start bound)
    fn fuzzy_date(&self) -> &FuzzyDate;
}

impl Dated for FuzzyDate {
    fn fuzzy_date(&self) -> &FuzzyDate {
        self
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn fuzzy_date(&self) -> &FuzzyDate {
        (**self).fuzzy_date()
    }
}

/// Bucket identity: a display label plus a numeric chronological ordinal
///
/// Buckets are ordered by `ordinal`. Labels are for display only; comparing
/// them as strings misorders spans such as "900-999" and "1000-1099".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    /// Chronological position within the level
    pub ordinal: i64,
    /// Display label
    pub label: String,
}

impl PeriodKey {
    /// Key of the bucket containing `date` at `level`
    pub fn for_date(date: NaiveDate, level: TimeCluster) -> Self {
        let year = date.year();
        match level {
            TimeCluster::Year => Self {
                ordinal: i64::from(year),
                label: year.to_string(),
            },
            TimeCluster::Decade => Self {
                ordinal: i64::from(decade_start(year)),
                label: decade_label(year),
            },
            TimeCluster::Century => Self {
                ordinal: i64::from(century_number(year)),
                label: century_label(year),
            },
            TimeCluster::Month => Self {
                ordinal: i64::from(year) * 12 + i64::from(date.month0()),
                label: format_month_year(date),
            },
            TimeCluster::Era => {
                let start = era_start(year);
                Self {
                    ordinal: i64::from(start),
                    label: format!("{}-{}", start, start + 99),
                }
            }
        }
    }
}

/// Pick a granularity from the span of years being viewed
///
/// Thresholds are inclusive and checked from the widest bucket down.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chronicle_domain::{auto_cluster_level, TimeCluster};
///
/// let min = NaiveDate::from_ymd_opt(1800, 1, 1).unwrap();
/// let max = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// assert_eq!(auto_cluster_level(min, max), TimeCluster::Century);
/// ```
pub fn auto_cluster_level(min: NaiveDate, max: NaiveDate) -> TimeCluster {
    let span = max.year() - min.year();

    if span >= 200 {
        TimeCluster::Century
    } else if span >= 50 {
        TimeCluster::Decade
    } else if span >= 5 {
        TimeCluster::Year
    } else {
        TimeCluster::Month
    }
}

/// Earliest and latest start date across `items`
///
/// Only starts are compared since buckets are keyed on the start date.
pub fn date_bounds<T: Dated>(items: &[T]) -> Option<(NaiveDate, NaiveDate)> {
    let starts = items.iter().map(|i| i.fuzzy_date().date_start());
    let min = starts.clone().min()?;
    let max = starts.max()?;
    Some((min, max))
}

/// Auto-detected granularity for a set of items, `None` when empty
pub fn auto_cluster_level_for<T: Dated>(items: &[T]) -> Option<TimeCluster> {
    date_bounds(items).map(|(min, max)| auto_cluster_level(min, max))
}

/// Display label for a bucket key
///
/// Keys are produced display-ready, so this is the identity for every level.
pub fn format_cluster_label(key: &str, _level: TimeCluster) -> &str {
    key
}

/// A single period bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    key: PeriodKey,
    items: Vec<T>,
}

impl<T> Bucket<T> {
    /// Bucket key
    pub fn key(&self) -> &PeriodKey {
        &self.key
    }

    /// Display label
    pub fn label(&self) -> &str {
        &self.key.label
    }

    /// Items in input order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Ordered mapping of period label to items
///
/// Buckets keep the order in which their first item was seen until
/// [`Clusters::sort_by_period`] is called.
#[derive(Debug, Clone)]
pub struct Clusters<T> {
    level: TimeCluster,
    buckets: Vec<Bucket<T>>,
    index: HashMap<String, usize>,
}

impl<T> Clusters<T> {
    fn new(level: TimeCluster) -> Self {
        Self {
            level,
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, key: PeriodKey, item: T) {
        match self.index.get(&key.label) {
            Some(&slot) => self.buckets[slot].items.push(item),
            None => {
                self.index.insert(key.label.clone(), self.buckets.len());
                self.buckets.push(Bucket {
                    key,
                    items: vec![item],
                });
            }
        }
    }

    /// Granularity these buckets were built with
    pub fn level(&self) -> TimeCluster {
        self.level
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether there are no buckets
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of items across buckets
    pub fn item_count(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }

    /// Items of the bucket with `label`
    pub fn get(&self, label: &str) -> Option<&[T]> {
        self.index.get(label).map(|&slot| self.buckets[slot].items.as_slice())
    }

    /// Labels in current bucket order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.label())
    }

    /// Buckets in current order
    pub fn iter(&self) -> impl Iterator<Item = &Bucket<T>> {
        self.buckets.iter()
    }

    /// Reorder buckets chronologically by their numeric ordinal
    pub fn sort_by_period(&mut self, order: SortOrder) {
        match order {
            SortOrder::Asc => self.buckets.sort_by(|a, b| a.key.cmp(&b.key)),
            SortOrder::Desc => self.buckets.sort_by(|a, b| b.key.cmp(&a.key)),
        }
        self.index = self
            .buckets
            .iter()
            .enumerate()
            .map(|(slot, b)| (b.key.label.clone(), slot))
            .collect();
    }

    /// Consume into buckets in current order
    pub fn into_buckets(self) -> Vec<Bucket<T>> {
        self.buckets
    }
}

/// Group items into period buckets keyed by their start date
///
/// Every item lands in exactly one bucket, appended in input order. Only
/// periods that contain at least one item get a bucket. Items without a date
/// must be filtered out before calling this.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chronicle_domain::{cluster_by_period, FuzzyDate, TimeCluster};
///
/// let dates = vec![
///     FuzzyDate::exact(NaiveDate::from_ymd_opt(1995, 3, 1).unwrap()),
///     FuzzyDate::exact(NaiveDate::from_ymd_opt(1991, 7, 4).unwrap()),
///     FuzzyDate::exact(NaiveDate::from_ymd_opt(2003, 1, 9).unwrap()),
/// ];
/// let clusters = cluster_by_period(dates, TimeCluster::Decade);
/// assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["1990s", "2000s"]);
/// assert_eq!(clusters.get("1990s").unwrap().len(), 2);
/// ```
pub fn cluster_by_period<T, I>(items: I, level: TimeCluster) -> Clusters<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    let mut clusters = Clusters::new(level);
    for item in items {
        let key = PeriodKey::for_date(item.fuzzy_date().date_start(), level);
        clusters.push(key, item);
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy_date::DatePrecision;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Doc {
        title: &'static str,
        date: FuzzyDate,
    }

    impl Dated for Doc {
        fn fuzzy_date(&self) -> &FuzzyDate {
            &self.date
        }
    }

    fn doc(title: &'static str, y: i32, m: u32, d: u32) -> Doc {
        Doc {
            title,
            date: FuzzyDate::exact(ymd(y, m, d)),
        }
    }

    #[test]
    fn test_auto_level_boundaries() {
        let level = |a: i32, b: i32| auto_cluster_level(ymd(a, 1, 1), ymd(b, 1, 1));

        assert_eq!(level(1800, 2020), TimeCluster::Century);
        assert_eq!(level(1800, 2000), TimeCluster::Century);
        assert_eq!(level(1801, 2000), TimeCluster::Decade);
        assert_eq!(level(1960, 2020), TimeCluster::Decade);
        assert_eq!(level(1970, 2020), TimeCluster::Decade);
        assert_eq!(level(1990, 2020), TimeCluster::Year);
        assert_eq!(level(2010, 2020), TimeCluster::Year);
        assert_eq!(level(2015, 2020), TimeCluster::Year);
        assert_eq!(level(2018, 2020), TimeCluster::Month);
        assert_eq!(level(2020, 2020), TimeCluster::Month);
    }

    #[test]
    fn test_auto_level_uses_calendar_years() {
        // Under five full years, but the calendar years differ by five
        assert_eq!(
            auto_cluster_level(ymd(2015, 12, 31), ymd(2020, 1, 1)),
            TimeCluster::Year
        );
    }

    #[test]
    fn test_cluster_keys_per_level() {
        let date = ymd(1995, 12, 5);
        assert_eq!(PeriodKey::for_date(date, TimeCluster::Year).label, "1995");
        assert_eq!(PeriodKey::for_date(date, TimeCluster::Decade).label, "1990s");
        assert_eq!(PeriodKey::for_date(date, TimeCluster::Century).label, "20th Century");
        assert_eq!(PeriodKey::for_date(date, TimeCluster::Month).label, "December 1995");
        assert_eq!(PeriodKey::for_date(date, TimeCluster::Era).label, "1900-1999");
    }

    #[test]
    fn test_cluster_preserves_input_order_within_bucket() {
        let docs = vec![
            doc("b", 1995, 6, 1),
            doc("x", 2001, 1, 1),
            doc("a", 1991, 1, 1),
            doc("c", 1999, 12, 31),
        ];

        let clusters = cluster_by_period(docs, TimeCluster::Decade);
        assert_eq!(clusters.len(), 2);

        let nineties: Vec<_> = clusters.get("1990s").unwrap().iter().map(|d| d.title).collect();
        assert_eq!(nineties, vec!["b", "a", "c"]);
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["1990s", "2000s"]);
    }

    #[test]
    fn test_cluster_uses_start_date() {
        let spanning = Doc {
            title: "war",
            date: FuzzyDate::period(ymd(1939, 9, 1), ymd(1945, 9, 2), Some(DatePrecision::Year))
                .unwrap(),
        };
        let clusters = cluster_by_period(vec![spanning], TimeCluster::Decade);
        assert!(clusters.get("1930s").is_some());
        assert!(clusters.get("1940s").is_none());
    }

    #[test]
    fn test_empty_input() {
        let clusters = cluster_by_period(Vec::<Doc>::new(), TimeCluster::Year);
        assert!(clusters.is_empty());
        assert_eq!(clusters.item_count(), 0);
    }

    #[test]
    fn test_numeric_sort_for_eras() {
        let docs = vec![doc("late", 1066, 10, 14), doc("early", 950, 1, 1)];
        let mut clusters = cluster_by_period(docs, TimeCluster::Era);

        clusters.sort_by_period(SortOrder::Asc);
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["900-999", "1000-1099"]);

        clusters.sort_by_period(SortOrder::Desc);
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["1000-1099", "900-999"]);
        assert_eq!(clusters.get("900-999").unwrap()[0].title, "early");
    }

    #[test]
    fn test_numeric_sort_for_decades_and_months() {
        let docs = vec![doc("a", 2001, 1, 1), doc("b", 995, 1, 1)];
        let mut clusters = cluster_by_period(docs, TimeCluster::Decade);
        clusters.sort_by_period(SortOrder::Asc);
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["990s", "2000s"]);

        let docs = vec![doc("a", 1995, 12, 1), doc("b", 1995, 2, 1), doc("c", 1994, 12, 1)];
        let mut clusters = cluster_by_period(docs, TimeCluster::Month);
        clusters.sort_by_period(SortOrder::Asc);
        assert_eq!(
            clusters.labels().collect::<Vec<_>>(),
            vec!["December 1994", "February 1995", "December 1995"]
        );
    }

    #[test]
    fn test_numeric_sort_for_centuries() {
        let docs = vec![doc("a", 1995, 1, 1), doc("b", 850, 1, 1), doc("c", 1066, 1, 1)];
        let mut clusters = cluster_by_period(docs, TimeCluster::Century);
        clusters.sort_by_period(SortOrder::Asc);
        assert_eq!(
            clusters.labels().collect::<Vec<_>>(),
            vec!["9th Century", "11st Century", "20th Century"]
        );
    }

    #[test]
    fn test_date_bounds() {
        let docs = vec![
            Doc {
                title: "a",
                date: FuzzyDate::period(ymd(1940, 1, 1), ymd(1949, 12, 31), None).unwrap(),
            },
            doc("b", 1945, 5, 8),
        ];
        assert_eq!(date_bounds(&docs), Some((ymd(1940, 1, 1), ymd(1945, 5, 8))));
        assert_eq!(auto_cluster_level_for(&docs), Some(TimeCluster::Year));
        assert_eq!(date_bounds::<Doc>(&[]), None);
    }

    #[test]
    fn test_long_period_does_not_widen_auto_level() {
        let docs = vec![
            doc("exact", 1942, 3, 14),
            Doc {
                title: "long",
                date: FuzzyDate::period(ymd(1942, 6, 1), ymd(2020, 12, 31), None).unwrap(),
            },
        ];
        assert_eq!(date_bounds(&docs), Some((ymd(1942, 3, 14), ymd(1942, 6, 1))));
        assert_eq!(auto_cluster_level_for(&docs), Some(TimeCluster::Month));

        let clusters = cluster_by_period(docs.iter(), TimeCluster::Month);
        assert_eq!(clusters.labels().collect::<Vec<_>>(), vec!["March 1942", "June 1942"]);
    }

    #[test]
    fn test_cluster_by_reference() {
        let docs = vec![doc("a", 1995, 1, 1), doc("b", 1996, 1, 1)];
        let clusters = cluster_by_period(docs.iter(), TimeCluster::Year);
        assert_eq!(clusters.get("1996").unwrap()[0].title, "b");
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("Decade".parse::<TimeCluster>(), Ok(TimeCluster::Decade));
        assert!("week".parse::<TimeCluster>().is_err());
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_format_cluster_label_is_identity() {
        assert_eq!(format_cluster_label("1990s", TimeCluster::Decade), "1990s");
        assert_eq!(format_cluster_label("1900-1999", TimeCluster::Era), "1900-1999");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_level() -> impl Strategy<Value = TimeCluster> {
        prop_oneof![
            Just(TimeCluster::Era),
            Just(TimeCluster::Century),
            Just(TimeCluster::Decade),
            Just(TimeCluster::Year),
            Just(TimeCluster::Month),
        ]
    }

    fn arb_dates() -> impl Strategy<Value = Vec<FuzzyDate>> {
        prop::collection::vec((1i32..=2100, 1u32..=12, 1u32..=28), 0..50).prop_map(|v| {
            v.into_iter()
                .map(|(y, m, d)| FuzzyDate::exact(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
                .collect()
        })
    }

    proptest! {
        /// Property: clustering partitions the input without loss or duplication
        #[test]
        fn test_clusters_partition_input(dates in arb_dates(), level in arb_level()) {
            let wrapped: Vec<Indexed> = dates.iter().cloned().enumerate().map(|(i, d)| Indexed(i, d)).collect();
            let clusters = cluster_by_period(wrapped, level);

            prop_assert_eq!(clusters.item_count(), dates.len());

            let mut seen: Vec<usize> = clusters.iter().flat_map(|b| b.items().iter().map(|i| i.0)).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..dates.len()).collect::<Vec<_>>());

            for bucket in clusters.iter() {
                prop_assert!(!bucket.items().is_empty());
                // Input order is preserved inside each bucket
                let order: Vec<usize> = bucket.items().iter().map(|i| i.0).collect();
                let mut sorted = order.clone();
                sorted.sort_unstable();
                prop_assert_eq!(order, sorted);
                for item in bucket.items() {
                    prop_assert_eq!(&PeriodKey::for_date(item.1.date_start(), level), bucket.key());
                }
            }
        }

        /// Property: ascending bucket order follows the start dates
        #[test]
        fn test_sorted_buckets_are_chronological(dates in arb_dates(), level in arb_level()) {
            let mut clusters = cluster_by_period(dates, level);
            clusters.sort_by_period(SortOrder::Asc);
            let firsts: Vec<NaiveDate> = clusters
                .iter()
                .map(|b| b.items().iter().map(|d| d.date_start()).min().unwrap())
                .collect();
            let mut sorted = firsts.clone();
            sorted.sort();
            prop_assert_eq!(firsts, sorted);
        }
    }

    #[derive(Debug, Clone)]
    struct Indexed(usize, FuzzyDate);

    impl Dated for Indexed {
        fn fuzzy_date(&self) -> &FuzzyDate {
            &self.1
        }
    }
}
