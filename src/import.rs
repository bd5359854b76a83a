//! Bulk loading of headline rows into the search database.
//!
//! Accepts either a JSON array of rows or JSON lines (one row per line).
//! Field names follow the database columns; `date` and `issueNumber` are
//! accepted as aliases.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;

use news_archive_core::models::HeadlineRow;

use crate::config::Config;
use crate::db;

#[derive(Debug, Deserialize)]
struct ImportRecord {
    #[serde(alias = "date")]
    issue_date: String,
    #[serde(default, alias = "issueNumber")]
    number: Option<i64>,
    headline: String,
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    length: Option<i64>,
}

impl From<ImportRecord> for HeadlineRow {
    fn from(r: ImportRecord) -> Self {
        HeadlineRow {
            issue_date: r.issue_date,
            number: r.number,
            headline: r.headline,
            page: r.page,
            length: r.length,
        }
    }
}

/// Parse a JSON array or JSON-lines document into headline rows.
pub fn parse_rows(content: &str) -> Result<Vec<HeadlineRow>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        let records: Vec<ImportRecord> =
            serde_json::from_str(trimmed).context("invalid JSON array of headline rows")?;
        return Ok(records.into_iter().map(HeadlineRow::from).collect());
    }

    let mut rows = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: ImportRecord = serde_json::from_str(line)
            .with_context(|| format!("invalid headline row on line {}", i + 1))?;
        rows.push(record.into());
    }
    Ok(rows)
}

/// Issue dates must be ISO `YYYY-MM-DD`; the "latest" listing sorts them as
/// text.
fn check_issue_date(row: &HeadlineRow) -> Result<()> {
    if NaiveDate::parse_from_str(&row.issue_date, "%Y-%m-%d").is_err() || row.issue_date.len() != 10 {
        bail!(
            "headline row has invalid issue_date {:?}: {:?}",
            row.issue_date,
            row.headline
        );
    }
    Ok(())
}

/// Insert rows in one transaction, optionally clearing the table first.
pub async fn import_rows(pool: &SqlitePool, rows: &[HeadlineRow], replace: bool) -> Result<usize> {
    let mut tx = pool.begin().await?;

    if replace {
        sqlx::query("DELETE FROM headlines").execute(&mut *tx).await?;
    }

    for row in rows {
        check_issue_date(row)?;
        sqlx::query(
            "INSERT INTO headlines (issue_date, number, headline, page, length) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&row.issue_date)
        .bind(row.number)
        .bind(&row.headline)
        .bind(row.page)
        .bind(row.length)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(rows.len())
}

pub async fn run_import(config: &Config, file: &Path, replace: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let rows = parse_rows(&content)?;

    let pool = db::connect(config).await?;
    let imported = import_rows(&pool, &rows, replace).await?;
    pool.close().await;

    tracing::info!(file = %file.display(), imported, replace, "headline import finished");
    println!("imported headlines: {}", imported);
    if replace {
        println!("previous rows replaced");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array_with_aliases() {
        let rows = parse_rows(
            r#"[
                {"issue_date": "1966-01-01", "number": 1, "headline": "A", "page": 1, "length": 10},
                {"date": "1966-01-02", "issueNumber": 2, "headline": "B"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].issue_date, "1966-01-02");
        assert_eq!(rows[1].number, Some(2));
        assert_eq!(rows[1].page, None);
    }

    #[test]
    fn test_parse_json_lines() {
        let rows = parse_rows(
            "{\"issue_date\": \"1966-01-01\", \"headline\": \"A\"}\n\n{\"issue_date\": \"1966-01-02\", \"headline\": \"B\"}\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = parse_rows("{\"issue_date\": \"1966-01-01\", \"headline\": \"A\"}\nnot json").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_issue_date_must_be_iso() {
        let mut row = parse_rows("{\"issue_date\": \"1966-01-01\", \"headline\": \"A\"}")
            .unwrap()
            .remove(0);
        assert!(check_issue_date(&row).is_ok());
        row.issue_date = "1966-1-1".to_string();
        assert!(check_issue_date(&row).is_err());
        row.issue_date = String::new();
        assert!(check_issue_date(&row).is_err());
    }
}
