//! Archive index and sibling navigation.
//!
//! The archive index maps year labels to the months (and, for calendar
//! archives, the days) that have content. Two shapes exist in the wild:
//!
//! ```text
//! { "1966": ["01", "02"] }                                   // month list
//! { "1939 SH": { "01": [{"day": "03", "path": "1939SH/1939.01.03.html"}] } }  // calendar
//! ```
//!
//! A month may also map to a bare list of day labels or to an object keyed by
//! day label. All shapes are read-only after loading.
//!
//! Navigation never fails: unknown labels and empty collections resolve to
//! "no sibling", and the caller renders a disabled control.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Article;
use crate::query::parse_int_prefix;

/// Direction of a previous/next lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// A linked day inside a calendar archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLink {
    pub day: String,
    pub path: String,
}

/// The contents of one month in a year that is keyed by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthEntry {
    /// Bare day labels.
    Days(Vec<String>),
    /// Day links in publication order.
    Links(Vec<DayLink>),
    /// Day links keyed by day label.
    LinkMap(BTreeMap<String, DayLink>),
}

/// The contents of one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearEntry {
    /// Ordered month labels (`["01", "02", ...]`).
    Months(Vec<String>),
    /// Month label → days. Iterated in label order.
    Calendar(BTreeMap<String, MonthEntry>),
}

/// Year label → year contents. Year labels iterate lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArchiveIndex {
    years: BTreeMap<String, YearEntry>,
}

impl ArchiveIndex {
    pub fn new(years: BTreeMap<String, YearEntry>) -> Self {
        Self { years }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// All year labels in lexicographic order.
    pub fn years(&self) -> Vec<&str> {
        self.years.keys().map(String::as_str).collect()
    }

    pub fn contains_year(&self, year: &str) -> bool {
        self.years.contains_key(year)
    }

    /// Month labels of `year` in their defined order, or `None` for an
    /// unknown year.
    pub fn months(&self, year: &str) -> Option<Vec<&str>> {
        self.years.get(year).map(|entry| match entry {
            YearEntry::Months(months) => months.iter().map(String::as_str).collect(),
            YearEntry::Calendar(months) => months.keys().map(String::as_str).collect(),
        })
    }

    /// True when `year` carries per-day links (a calendar archive year).
    pub fn is_calendar(&self, year: &str) -> bool {
        matches!(self.years.get(year), Some(YearEntry::Calendar(_)))
    }

    /// Days indexed for `year`/`month`, when the year is keyed by month.
    ///
    /// Bare day labels come back with an empty `path`.
    pub fn days(&self, year: &str, month: &str) -> Vec<DayLink> {
        let Some(YearEntry::Calendar(months)) = self.years.get(year) else {
            return Vec::new();
        };
        match months.get(month) {
            Some(MonthEntry::Days(days)) => days
                .iter()
                .map(|d| DayLink {
                    day: d.clone(),
                    path: String::new(),
                })
                .collect(),
            Some(MonthEntry::Links(links)) => links.clone(),
            Some(MonthEntry::LinkMap(map)) => map.values().cloned().collect(),
            None => Vec::new(),
        }
    }
}

/// A month within a year, written `"<year>.<month>"` in URLs and data file
/// names (`"1966.01"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: String,
    pub month: String,
}

impl MonthKey {
    pub fn new(year: impl Into<String>, month: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            month: month.into(),
        }
    }

    /// Parse a `"YYYY.MM"` label. Anything else is rejected.
    pub fn parse(label: &str) -> Option<Self> {
        let (year, month) = label.split_once('.')?;
        let all_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(year, 4) || !all_digits(month, 2) {
            return None;
        }
        Some(Self::new(year, month))
    }

    /// Extract the month from an article path of the form
    /// `"YYYY.MM/<file>"`.
    pub fn from_article_path(path: &str) -> Option<Self> {
        let (prefix, file) = path.split_once('/')?;
        if file.is_empty() {
            return None;
        }
        Self::parse(prefix)
    }

    /// ISO date of `day` within this month (`"1966-01-05"`). The day is
    /// zero-padded to two digits.
    pub fn iso_date(&self, day: &str) -> String {
        format!("{}-{}-{}", self.year, self.month, pad_day(day))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.year, self.month)
    }
}

/// Split a year label into its year and optional location suffix
/// (`"1939 SH"` → `("1939", Some("SH"))`).
pub fn split_year_label(label: &str) -> (&str, Option<&str>) {
    match label.split_once(' ') {
        Some((year, location)) if !location.trim().is_empty() => (year, Some(location.trim())),
        _ => (label.trim(), None),
    }
}

/// Left-pad a numeric day label to two digits; other labels pass through.
pub fn pad_day(day: &str) -> String {
    if day.len() == 1 && day.bytes().all(|b| b.is_ascii_digit()) {
        format!("0{}", day)
    } else {
        day.to_string()
    }
}

fn neighbour<'a>(items: &[&'a str], current: &str, dir: Direction) -> Option<&'a str> {
    let pos = items.iter().position(|item| *item == current)?;
    match dir {
        Direction::Prev => pos.checked_sub(1).and_then(|i| items.get(i)).copied(),
        Direction::Next => items.get(pos + 1).copied(),
    }
}

/// The year label before or after `year` in lexicographic order.
pub fn sibling_year(index: &ArchiveIndex, year: &str, dir: Direction) -> Option<String> {
    neighbour(&index.years(), year, dir).map(str::to_string)
}

/// The month before or after `year`/`month`.
///
/// At a year boundary this rolls over to the last (or first) month of the
/// nearest year in that direction that has any months at all.
pub fn sibling_month(
    index: &ArchiveIndex,
    year: &str,
    month: &str,
    dir: Direction,
) -> Option<MonthKey> {
    let months = index.months(year)?;
    let pos = months.iter().position(|m| *m == month)?;

    let within = match dir {
        Direction::Prev => pos.checked_sub(1).and_then(|i| months.get(i)),
        Direction::Next => months.get(pos + 1),
    };
    if let Some(m) = within {
        return Some(MonthKey::new(year, *m));
    }

    let mut current = year.to_string();
    while let Some(adjacent) = sibling_year(index, &current, dir) {
        let adjacent_months = index.months(&adjacent).unwrap_or_default();
        let edge = match dir {
            Direction::Prev => adjacent_months.last(),
            Direction::Next => adjacent_months.first(),
        };
        if let Some(m) = edge {
            return Some(MonthKey::new(adjacent.as_str(), *m));
        }
        current = adjacent;
    }
    None
}

/// Distinct day labels present in a month's articles, sorted numerically.
pub fn days_in_month(articles: &[Article]) -> Vec<String> {
    let mut days: Vec<String> = articles
        .iter()
        .filter_map(Article::day)
        .map(str::to_string)
        .collect();
    days.sort_by(|a, b| {
        let (na, nb) = (parse_int_prefix(a), parse_int_prefix(b));
        match (na, nb) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    days.dedup();
    days
}

/// The day before or after `day` among the days that have articles in this
/// month. Navigation stays inside the month: the first and last days have no
/// sibling in the outward direction.
pub fn sibling_day(month_articles: &[Article], day: &str, dir: Direction) -> Option<String> {
    let days = days_in_month(month_articles);
    let wanted = pad_day(day);
    let pos = days.iter().position(|d| pad_day(d) == wanted)?;
    match dir {
        Direction::Prev => pos.checked_sub(1).and_then(|i| days.get(i)).cloned(),
        Direction::Next => days.get(pos + 1).cloned(),
    }
}
