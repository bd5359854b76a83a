use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config::Config;

/// Path of the headline database, or an error when `[db]` is not configured.
pub fn db_path(config: &Config) -> Result<&Path> {
    config
        .db
        .as_ref()
        .map(|db| db.path.as_path())
        .context("no [db] section in config; the headline database is not configured")
}

/// Open the headline database for writing, creating it if missing.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = db_path(config)?;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open an existing headline database. Fails instead of creating an empty
/// file, so a missing database is reported rather than searched.
pub async fn open_existing(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(false)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open headline database: {}", path.display()))
}
