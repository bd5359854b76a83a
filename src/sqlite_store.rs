//! SQLite-backed [`HeadlineStore`] implementation.
//!
//! Full-text queries go through the external-content FTS5 table
//! `headlines_fts` and join back to `headlines` by rowid.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use news_archive_core::models::HeadlineRow;
use news_archive_core::store::HeadlineStore;

/// SQLite implementation of the [`HeadlineStore`] trait.
pub struct SqliteHeadlineStore {
    pool: SqlitePool,
}

impl SqliteHeadlineStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_row(row: &SqliteRow) -> Result<HeadlineRow> {
    Ok(HeadlineRow {
        issue_date: row.try_get("issue_date")?,
        number: row.try_get("number")?,
        headline: row.try_get("headline")?,
        page: row.try_get("page")?,
        length: row.try_get("length")?,
    })
}

fn bounds(limit: u32, offset: u64) -> (i64, i64) {
    (i64::from(limit), i64::try_from(offset).unwrap_or(i64::MAX))
}

#[async_trait]
impl HeadlineStore for SqliteHeadlineStore {
    async fn search(&self, term: &str, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>> {
        let (limit, offset) = bounds(limit, offset);
        let rows = sqlx::query(
            r#"
            SELECT h.issue_date, h.number, h.headline, h.page, h.length
            FROM headlines_fts fts
            JOIN headlines h ON fts.rowid = h.id
            WHERE fts.headlines_fts MATCH ?
            ORDER BY rank
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(term)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(to_row).collect()
    }

    async fn count(&self, term: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM headlines_fts WHERE headlines_fts MATCH ?")
                .bind(term)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn latest(&self, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>> {
        let (limit, offset) = bounds(limit, offset);
        let rows = sqlx::query(
            r#"
            SELECT issue_date, number, headline, page, length
            FROM headlines
            ORDER BY issue_date DESC, number ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(to_row).collect()
    }

    async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM headlines")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
