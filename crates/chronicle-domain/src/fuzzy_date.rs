//! Fuzzy date module - exact dates and approximate periods
//!
//! Archived material is often dated loosely ("circa 1940s", "Winter 1942").
//! A [`FuzzyDate`] stores the inclusive bounds of the period together with how
//! precisely those bounds are known, and renders itself for display.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// English long month names, indexed by `month0`
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Errors raised when building a fuzzy date at the data-entry boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input is not an ISO `YYYY-MM-DD` calendar date
    #[error("Malformed date '{0}': expected YYYY-MM-DD")]
    Malformed(String),

    /// Start of the period falls after its end
    #[error("Date range is inverted: {start} is after {end}")]
    InvertedRange {
        /// Start bound as given
        start: NaiveDate,
        /// End bound as given
        end: NaiveDate,
    },
}

/// How precisely an approximate date is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    /// Known to the day
    Day,
    /// Known to the month
    Month,
    /// Known to the year
    Year,
    /// Known to the decade
    Decade,
    /// Known to the century
    Century,
    /// Only a broad era is known
    Era,
}

impl DatePrecision {
    /// Get the precision name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePrecision::Day => "day",
            DatePrecision::Month => "month",
            DatePrecision::Year => "year",
            DatePrecision::Decade => "decade",
            DatePrecision::Century => "century",
            DatePrecision::Era => "era",
        }
    }

    /// Parse a precision from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" => Some(DatePrecision::Day),
            "month" => Some(DatePrecision::Month),
            "year" => Some(DatePrecision::Year),
            "decade" => Some(DatePrecision::Decade),
            "century" => Some(DatePrecision::Century),
            "era" => Some(DatePrecision::Era),
            _ => None,
        }
    }

    /// Narrowest precision whose aligned period contains `start..=end`
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use chronicle_domain::DatePrecision;
    ///
    /// let start = NaiveDate::from_ymd_opt(1942, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(1942, 12, 31).unwrap();
    /// assert_eq!(DatePrecision::infer(start, end), DatePrecision::Year);
    /// ```
    pub fn infer(start: NaiveDate, end: NaiveDate) -> Self {
        if start == end {
            DatePrecision::Day
        } else if start.year() == end.year() && start.month() == end.month() {
            DatePrecision::Month
        } else if start.year() == end.year() {
            DatePrecision::Year
        } else if start.year().div_euclid(10) == end.year().div_euclid(10) {
            DatePrecision::Decade
        } else if century_number(start.year()) == century_number(end.year()) {
            DatePrecision::Century
        } else {
            DatePrecision::Era
        }
    }
}

impl std::str::FromStr for DatePrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid precision: {}", s))
    }
}

impl fmt::Display for DatePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporal information attached to an archived item
///
/// Bounds are inclusive and always ordered (`date_start <= date_end`). Values
/// are never edited in place: builder methods consume `self` and return the
/// replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawFuzzyDate")]
pub struct FuzzyDate {
    date_start: NaiveDate,
    date_end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_date: Option<String>,
    is_approximate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    precision: Option<DatePrecision>,
}

/// Unchecked wire shape, validated into [`FuzzyDate`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFuzzyDate {
    date_start: NaiveDate,
    date_end: NaiveDate,
    #[serde(default)]
    display_date: Option<String>,
    #[serde(default)]
    is_approximate: bool,
    #[serde(default)]
    precision: Option<DatePrecision>,
}

impl TryFrom<RawFuzzyDate> for FuzzyDate {
    type Error = DateError;

    fn try_from(raw: RawFuzzyDate) -> Result<Self, Self::Error> {
        Ok(FuzzyDate::new(raw.date_start, raw.date_end, raw.is_approximate, raw.precision)?
            .with_display_date(raw.display_date))
    }
}

impl FuzzyDate {
    /// Create a fuzzy date, checking that the bounds are ordered
    pub fn new(
        date_start: NaiveDate,
        date_end: NaiveDate,
        is_approximate: bool,
        precision: Option<DatePrecision>,
    ) -> Result<Self, DateError> {
        if date_start > date_end {
            return Err(DateError::InvertedRange {
                start: date_start,
                end: date_end,
            });
        }

        Ok(Self {
            date_start,
            date_end,
            display_date: None,
            is_approximate,
            precision,
        })
    }

    /// A verified single-day date
    pub fn exact(date: NaiveDate) -> Self {
        Self {
            date_start: date,
            date_end: date,
            display_date: None,
            is_approximate: false,
            precision: Some(DatePrecision::Day),
        }
    }

    /// An approximate period
    pub fn period(
        date_start: NaiveDate,
        date_end: NaiveDate,
        precision: Option<DatePrecision>,
    ) -> Result<Self, DateError> {
        Self::new(date_start, date_end, true, precision)
    }

    /// Replace the human-authored display override
    pub fn with_display_date(mut self, display_date: Option<String>) -> Self {
        self.display_date = display_date;
        self
    }

    /// Start of the period (inclusive)
    pub fn date_start(&self) -> NaiveDate {
        self.date_start
    }

    /// End of the period (inclusive)
    pub fn date_end(&self) -> NaiveDate {
        self.date_end
    }

    /// Display override, if any
    pub fn display_date(&self) -> Option<&str> {
        self.display_date.as_deref()
    }

    /// Whether this is an uncertain period rather than a verified date
    pub fn is_approximate(&self) -> bool {
        self.is_approximate
    }

    /// Rendering precision for approximate dates
    pub fn precision(&self) -> Option<DatePrecision> {
        self.precision
    }

    /// Check whether this date overlaps the optional bounds `from..=to`
    pub fn overlaps(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        if from.is_some_and(|from| self.date_end < from) {
            return false;
        }
        if to.is_some_and(|to| self.date_start > to) {
            return false;
        }
        true
    }

    /// Render for display; see [`render_fuzzy_date`]
    pub fn render(&self) -> String {
        render_fuzzy_date(self)
    }
}

impl fmt::Display for FuzzyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Parse an ISO `YYYY-MM-DD` calendar date
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DateError::Malformed(s.to_string()))
}

/// Render a fuzzy date as a human-readable string
///
/// A non-blank display override always wins. Exact dates render in long form,
/// approximate dates use their precision, and everything else renders as a
/// range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use chronicle_domain::{render_fuzzy_date, DatePrecision, FuzzyDate};
///
/// let day = NaiveDate::from_ymd_opt(1995, 12, 5).unwrap();
/// assert_eq!(render_fuzzy_date(&FuzzyDate::exact(day)), "December 5, 1995");
///
/// let start = NaiveDate::from_ymd_opt(1995, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(1995, 12, 31).unwrap();
/// let circa = FuzzyDate::period(start, end, Some(DatePrecision::Decade)).unwrap();
/// assert_eq!(render_fuzzy_date(&circa), "circa 1990s");
/// ```
pub fn render_fuzzy_date(date: &FuzzyDate) -> String {
    if let Some(display) = date.display_date() {
        if !display.trim().is_empty() {
            return display.to_string();
        }
    }

    let start = date.date_start;

    if start == date.date_end && !date.is_approximate {
        return format_long_date(start);
    }

    if date.is_approximate {
        let descriptor = approximate_descriptor(date.precision);
        match date.precision {
            Some(DatePrecision::Decade) => {
                return format!("{} {}", descriptor, decade_label(start.year()));
            }
            Some(DatePrecision::Century) => {
                return format!("{} {}", descriptor, century_label(start.year()));
            }
            Some(DatePrecision::Year) => return format!("{} {}", descriptor, start.year()),
            Some(DatePrecision::Month) => {
                return format!("{} {}", descriptor, format_month_year(start));
            }
            // Day, era and missing precision render as a range
            _ => {}
        }
    }

    format_date_range(start, date.date_end)
}

/// Qualifier placed before an approximate date
pub fn approximate_descriptor(precision: Option<DatePrecision>) -> &'static str {
    match precision {
        Some(DatePrecision::Decade) => "circa",
        Some(DatePrecision::Century) => "approximately",
        Some(DatePrecision::Era) => "around",
        _ => "circa",
    }
}

/// Decade label for a year (1995 -> "1990s")
pub fn decade_label(year: i32) -> String {
    format!("{}s", decade_start(year))
}

/// Century label for a year (1995 -> "20th Century")
///
/// The suffix only looks at the whole century number: 1 -> "st", 2 -> "nd",
/// 3 -> "rd", everything else "th". Centuries 11-13 therefore read "11st",
/// "12nd" and "13rd", and 21 reads "21th"; stored labels depend on this text.
pub fn century_label(year: i32) -> String {
    let century = century_number(year);
    let suffix = match century {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{} Century", century, suffix)
}

/// First year of the decade containing `year`
pub(crate) fn decade_start(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// First year of the 100-year span containing `year` (1995 -> 1900)
pub(crate) fn era_start(year: i32) -> i32 {
    year.div_euclid(100) * 100
}

/// `ceil(year / 100)`
pub(crate) fn century_number(year: i32) -> i32 {
    (year + 99).div_euclid(100)
}

/// English long month name
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// "Month D, YYYY"
pub fn format_long_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date), date.day(), date.year())
}

/// "Month YYYY"
pub fn format_month_year(date: NaiveDate) -> String {
    format!("{} {}", month_name(date), date.year())
}

/// Format an inclusive date range, collapsing shared year and month
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() != end.year() {
        return format!("{} - {}", format_month_year(start), format_month_year(end));
    }

    if start.month() != end.month() {
        return format!("{} - {}, {}", month_name(start), month_name(end), start.year());
    }

    if start.day() == end.day() {
        return format_long_date(start);
    }

    format!(
        "{} {} - {}, {}",
        month_name(start),
        start.day(),
        end.day(),
        start.year()
    )
}

/// Position of `date` on a vertical timeline spanning `min..=max`, in percent
///
/// A zero-length span places everything at 0.
pub fn timeline_position(date: NaiveDate, min: NaiveDate, max: NaiveDate) -> f64 {
    let total = (max - min).num_days();
    if total == 0 {
        return 0.0;
    }
    let offset = (date - min).num_days();
    offset as f64 / total as f64 * 100.0
}
