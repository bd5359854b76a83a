//! Core data models shared by the search endpoint and the archive browser.

use serde::{Deserialize, Deserializer, Serialize};

/// A translated article, as stored in a month data file.
///
/// `path` is unique within the archive and has the shape
/// `"<month>/<file>"`, e.g. `"1966.01/1966-01-01_Title.md"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub path: String,
    /// ISO date (`YYYY-MM-DD`). Missing dates deserialize as empty.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Page number as published; month files carry either strings or numbers.
    #[serde(default, deserialize_with = "string_or_number")]
    pub page_number: Option<String>,
    /// Bilingual body: English, then `<hr />`, then the original Chinese.
    #[serde(default)]
    pub content: String,
}

impl Article {
    /// Day component of the article date (`"05"` for `"1966-01-05"`).
    pub fn day(&self) -> Option<&str> {
        self.date.split('-').nth(2).filter(|d| !d.is_empty())
    }
}

/// One row of the headline search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineRow {
    pub issue_date: String,
    pub number: Option<i64>,
    pub headline: String,
    pub page: Option<i64>,
    pub length: Option<i64>,
}

/// JSON body of a successful `GET /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<HeadlineRow>,
    pub total_count: i64,
    pub page: u32,
    pub limit: u32,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
