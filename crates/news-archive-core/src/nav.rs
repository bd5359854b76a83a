//! URL parameters of the archive browser and the views they select.
//!
//! Every browser URL is a bag of optional query parameters
//! (`year`, `month`, `day`, `articlePath`, `full`, `lang`). The same bag is
//! used in both directions: parsed from an incoming request to pick a view,
//! and built for previous/next/back links.

use serde::{Deserialize, Serialize};

use crate::index::MonthKey;
use crate::query::decode_first_values;

/// A browser location expressed as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(
        default,
        rename = "articlePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub article_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// The view selected by a [`NavigationTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// List of years.
    Home,
    /// Months (or calendar) of one year.
    Year { year: String },
    /// Days of one month.
    Month { month: MonthKey },
    /// Article titles of one day.
    Day { month: MonthKey, day: String },
    /// Every article of one day, in full.
    FullDay { month: MonthKey, day: String },
    /// A single article.
    Article {
        month: MonthKey,
        path: String,
        hide_english: bool,
    },
    /// Parameters that cannot name any view.
    Invalid { message: String },
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl NavigationTarget {
    /// The archive home page.
    pub fn home() -> Self {
        Self::default()
    }

    pub fn year(year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            ..Self::default()
        }
    }

    pub fn month(month: &MonthKey) -> Self {
        Self {
            month: Some(month.to_string()),
            ..Self::default()
        }
    }

    pub fn day(month: &MonthKey, day: impl Into<String>) -> Self {
        Self {
            month: Some(month.to_string()),
            day: Some(day.into()),
            ..Self::default()
        }
    }

    pub fn full_day(month: &MonthKey, day: impl Into<String>) -> Self {
        Self {
            full: Some("yes".to_string()),
            ..Self::day(month, day)
        }
    }

    /// An article, optionally with the English half hidden (`lang=cn`).
    pub fn article(path: impl Into<String>, hide_english: bool) -> Self {
        Self {
            article_path: Some(path.into()),
            lang: hide_english.then(|| "cn".to_string()),
            ..Self::default()
        }
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Unknown parameters are ignored and a malformed string yields the home
    /// page, so a bad link never crashes the browser.
    pub fn parse(query: &str) -> Self {
        decode_first_values(query)
    }

    /// Encode as a query string, parameters in a fixed order.
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }

    /// Link to this target under `base` (the browser page path).
    pub fn href(&self, base: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }

    /// True when the English half should be hidden.
    pub fn hides_english(&self) -> bool {
        present(&self.lang) == Some("cn")
    }

    /// Resolve which view these parameters select.
    ///
    /// Precedence: `articlePath`, then `month`+`day`+`full=yes`, then
    /// `month`+`day`, then `month`, then `year`, else the home page.
    pub fn view(&self) -> View {
        if let Some(path) = present(&self.article_path) {
            return match MonthKey::from_article_path(path) {
                Some(month) => View::Article {
                    month,
                    path: path.to_string(),
                    hide_english: self.hides_english(),
                },
                None => View::Invalid {
                    message: format!("Invalid article path format: {}", path),
                },
            };
        }

        if let Some(month_label) = present(&self.month) {
            let Some(month) = MonthKey::parse(month_label) else {
                return View::Invalid {
                    message: format!("Invalid month: {}", month_label),
                };
            };
            return match present(&self.day) {
                Some(day) if present(&self.full) == Some("yes") => View::FullDay {
                    month,
                    day: day.to_string(),
                },
                Some(day) => View::Day {
                    month,
                    day: day.to_string(),
                },
                None => View::Month { month },
            };
        }

        match present(&self.year) {
            Some(year) => View::Year {
                year: year.to_string(),
            },
            None => View::Home,
        }
    }
}
