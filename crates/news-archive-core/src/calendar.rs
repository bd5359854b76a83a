//! Month calendar grids for archives indexed by day.

use chrono::{Datelike, NaiveDate};

use crate::index::{pad_day, split_year_label, DayLink};
use crate::query::parse_int_prefix;

/// Column headers, week starting on Sunday.
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One day cell. `link` is set when the archive has an issue for that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub day: u32,
    pub link: Option<String>,
}

/// A month laid out for a seven-column grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Full month name, e.g. `"January"`.
    pub name: String,
    /// Empty cells before day 1.
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

/// Lay out `month_label` of `year_label` with the given day links.
///
/// Returns `None` when the labels do not name a real month.
pub fn month_grid(year_label: &str, month_label: &str, links: &[DayLink]) -> Option<MonthGrid> {
    let (year, _) = split_year_label(year_label);
    let year = i32::try_from(parse_int_prefix(year)?).ok()?;
    let month = u32::try_from(parse_int_prefix(month_label)?).ok()?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let length = next_first.signed_duration_since(first).num_days() as u32;

    let days = (1..=length)
        .map(|day| {
            let label = format!("{:02}", day);
            let link = links
                .iter()
                .find(|l| pad_day(&l.day) == label)
                .map(|l| l.path.clone());
            CalendarDay { day, link }
        })
        .collect();

    Some(MonthGrid {
        name: first.format("%B").to_string(),
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}
