//! In-memory [`HeadlineStore`] for tests and small fixtures.
//!
//! Matching is a case-insensitive substring test per whitespace-separated
//! token; every token must match. A term with an unbalanced double quote is
//! rejected with the same wording SQLite's FTS5 uses, so error handling can
//! be exercised without a database.

use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::HeadlineRow;

use super::HeadlineStore;

/// Headline rows behind a `RwLock`, in insertion order.
pub struct InMemoryHeadlineStore {
    rows: RwLock<Vec<HeadlineRow>>,
}

impl InMemoryHeadlineStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn with_rows(rows: Vec<HeadlineRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub fn insert(&self, row: HeadlineRow) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
    }

    fn matching(&self, term: &str) -> Result<Vec<HeadlineRow>> {
        if term.matches('"').count() % 2 == 1 {
            bail!("fts5: syntax error near \"\"\"");
        }
        let tokens: Vec<String> = term
            .split_whitespace()
            .map(|t| t.trim_matches('"').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            bail!("fts5: syntax error near \"\"");
        }
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .iter()
            .filter(|row| {
                let headline = row.headline.to_lowercase();
                tokens.iter().all(|t| headline.contains(t.as_str()))
            })
            .cloned()
            .collect())
    }
}

impl Default for InMemoryHeadlineStore {
    fn default() -> Self {
        Self::new()
    }
}

fn window(rows: Vec<HeadlineRow>, limit: u32, offset: u64) -> Vec<HeadlineRow> {
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    rows.into_iter().skip(skip).take(limit as usize).collect()
}

/// `issue_date DESC, number ASC`, with a missing number first as in SQL.
fn latest_order(a: &HeadlineRow, b: &HeadlineRow) -> Ordering {
    b.issue_date
        .cmp(&a.issue_date)
        .then_with(|| a.number.cmp(&b.number))
}

#[async_trait]
impl HeadlineStore for InMemoryHeadlineStore {
    async fn search(&self, term: &str, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>> {
        Ok(window(self.matching(term)?, limit, offset))
    }

    async fn count(&self, term: &str) -> Result<i64> {
        Ok(self.matching(term)?.len() as i64)
    }

    async fn latest(&self, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>> {
        let mut rows = self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        rows.sort_by(latest_order);
        Ok(window(rows, limit, offset))
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.rows.read().unwrap_or_else(PoisonError::into_inner).len() as i64)
    }
}
