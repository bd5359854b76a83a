use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS headlines (
            id INTEGER PRIMARY KEY,
            issue_date TEXT NOT NULL,
            number INTEGER,
            headline TEXT NOT NULL,
            page INTEGER,
            length INTEGER
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // FTS5 CREATE is not idempotent natively, so we check first
    let fts_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='headlines_fts'",
    )
    .fetch_one(&pool)
    .await?;

    if !fts_exists {
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE headlines_fts USING fts5(
                headline,
                content='headlines',
                content_rowid='id'
            )
            "#,
        )
        .execute(&pool)
        .await?;

        // Index rows that were present before the FTS table existed.
        sqlx::query("INSERT INTO headlines_fts(headlines_fts) VALUES ('rebuild')")
            .execute(&pool)
            .await?;
    }

    // Keep the external-content FTS table in sync with the headline table.
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS headlines_ai AFTER INSERT ON headlines BEGIN
            INSERT INTO headlines_fts(rowid, headline) VALUES (new.id, new.headline);
        END
        "#,
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS headlines_ad AFTER DELETE ON headlines BEGIN
            INSERT INTO headlines_fts(headlines_fts, rowid, headline)
            VALUES ('delete', old.id, old.headline);
        END
        "#,
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS headlines_au AFTER UPDATE ON headlines BEGIN
            INSERT INTO headlines_fts(headlines_fts, rowid, headline)
            VALUES ('delete', old.id, old.headline);
            INSERT INTO headlines_fts(rowid, headline) VALUES (new.id, new.headline);
        END
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_headlines_latest ON headlines(issue_date DESC, number ASC)",
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
