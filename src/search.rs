//! Headline search execution and error classification.
//!
//! A search runs two queries concurrently against a [`HeadlineStore`]: the
//! page of rows and the total count. A non-empty term uses the full-text
//! index (best match first); an empty term lists the latest issues. Either
//! failure fails the whole search, so callers never see partial results.

use anyhow::Result;
use axum::http::StatusCode;
use std::fmt;

use news_archive_core::models::SearchResponse;
use news_archive_core::query::{normalize, SearchRequest};
use news_archive_core::store::HeadlineStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteHeadlineStore;

const BACKEND_MESSAGE_MAX: usize = 160;

/// Why a search failed, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No headline database is available.
    Configuration,
    /// The term is not valid full-text syntax.
    Validation,
    /// The database rejected the query.
    Backend(String),
    /// The database is saturated or rate limited.
    Overload,
    /// Anything else.
    Internal,
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::Validation => StatusCode::BAD_REQUEST,
            SearchError::Overload => StatusCode::TOO_MANY_REQUESTS,
            SearchError::Configuration | SearchError::Backend(_) | SearchError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            SearchError::Configuration => "Database configuration error.".to_string(),
            SearchError::Validation => {
                "Search query syntax error. Please check your search terms.".to_string()
            }
            SearchError::Backend(detail) => format!("Database query error: {}", detail),
            SearchError::Overload => {
                "Search service is temporarily busy due to high demand. Please try again shortly."
                    .to_string()
            }
            SearchError::Internal => "Failed to perform search.".to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SearchError::Configuration => "configuration",
            SearchError::Validation => "validation",
            SearchError::Backend(_) => "backend",
            SearchError::Overload => "overload",
            SearchError::Internal => "internal",
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for SearchError {}

const SYNTAX_MARKERS: &[&str] = &[
    "fts5: syntax error",
    "malformed match",
    "unterminated string",
    "unknown special query",
];

const NO_SUCH_COLUMN: &str = "no such column: ";

/// Columns the store's own SQL refers to. A missing one is a schema
/// problem, not a bad search term.
const SCHEMA_COLUMNS: &[&str] = &[
    "id",
    "rowid",
    "rank",
    "issue_date",
    "number",
    "headline",
    "page",
    "length",
    "headlines_fts",
];

/// True when `text` reports an unknown column that came from the search
/// term itself (an FTS column filter such as `foo:bar`).
fn unknown_query_column(text: &str) -> bool {
    let Some(start) = text.find(NO_SUCH_COLUMN) else {
        return false;
    };
    let name = text[start + NO_SUCH_COLUMN.len()..]
        .split(|c: char| c.is_whitespace() || c == ',' || c == ')')
        .next()
        .unwrap_or_default();
    let column = name.rsplit('.').next().unwrap_or(name);
    !column.is_empty() && !SCHEMA_COLUMNS.contains(&column)
}

const OVERLOAD_MARKERS: &[&str] = &[
    "rate limit",
    "too many requests",
    "database is locked",
    "database table is locked",
    "busy",
    "pool timed out",
];

/// Map a store failure onto the client-facing taxonomy.
///
/// The whole cause chain is inspected. Syntax markers win over overload
/// markers, which win over a generic database error.
pub fn classify(err: &anyhow::Error) -> SearchError {
    let text = format!("{:#}", err).to_lowercase();

    if SYNTAX_MARKERS.iter().any(|m| text.contains(m)) || unknown_query_column(&text) {
        return SearchError::Validation;
    }

    let mut database_message = None;
    for cause in err.chain() {
        match cause.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::PoolTimedOut) => return SearchError::Overload,
            Some(sqlx::Error::Database(db_err)) if database_message.is_none() => {
                database_message = Some(db_err.message().to_string());
            }
            _ => {}
        }
    }

    if OVERLOAD_MARKERS.iter().any(|m| text.contains(m)) {
        return SearchError::Overload;
    }

    match database_message {
        Some(message) => SearchError::Backend(sanitize(&message)),
        None => SearchError::Internal,
    }
}

/// First line only, control characters dropped, bounded length.
fn sanitize(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or_default();
    let mut clean: String = first_line.chars().filter(|c| !c.is_control()).collect();
    if clean.chars().count() > BACKEND_MESSAGE_MAX {
        clean = clean.chars().take(BACKEND_MESSAGE_MAX).collect();
        clean.push('…');
    }
    clean.trim().to_string()
}

/// Run one normalized search. `store` is `None` when no database is
/// configured.
pub async fn execute_search(
    store: Option<&dyn HeadlineStore>,
    request: &SearchRequest,
) -> Result<SearchResponse, SearchError> {
    let Some(store) = store else {
        tracing::error!("search requested but no headline database is configured");
        return Err(SearchError::Configuration);
    };

    let limit = request.limit;
    let offset = request.offset();

    let (rows, count) = if request.has_term() {
        tokio::join!(
            store.search(&request.term, limit, offset),
            store.count(&request.term)
        )
    } else {
        tokio::join!(store.latest(limit, offset), store.count_all())
    };

    // The count query's failure is the one reported when both fail.
    let total_count = count.map_err(|e| report(request, e))?;
    let results = rows.map_err(|e| report(request, e))?;

    tracing::info!(
        term = %request.term,
        page = request.page,
        limit,
        returned = results.len(),
        total = total_count,
        "search executed"
    );

    Ok(SearchResponse {
        results,
        total_count,
        page: request.page,
        limit,
    })
}

fn report(request: &SearchRequest, err: anyhow::Error) -> SearchError {
    let classified = classify(&err);
    tracing::warn!(
        term = %request.term,
        kind = classified.kind(),
        error = %format!("{:#}", err),
        "search failed"
    );
    classified
}

/// Open the configured headline database as a store.
pub async fn open_store(config: &Config) -> Result<SqliteHeadlineStore> {
    let path = db::db_path(config)?;
    let pool = db::open_existing(path).await?;
    Ok(SqliteHeadlineStore::new(pool))
}

pub async fn run_search(
    config: &Config,
    term: Option<&str>,
    page: Option<&str>,
    limit: Option<&str>,
) -> Result<()> {
    let request = normalize(term, limit, page);

    let store = match open_store(config).await {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "headline database unavailable");
            None
        }
    };

    let response = execute_search(store.as_ref().map(|s| s as &dyn HeadlineStore), &request)
        .await
        .map_err(|e| anyhow::anyhow!("{} (HTTP {})", e, e.status().as_u16()))?;

    if response.results.is_empty() {
        println!("No results.");
    }

    let first = request.offset() + 1;
    for (i, row) in response.results.iter().enumerate() {
        let number = row.number.map(|n| format!("No. {}", n)).unwrap_or_default();
        let page = row.page.map(|p| format!("p.{}", p)).unwrap_or_default();
        println!("{}. [{}] {}", first + i as u64, row.issue_date, row.headline);
        println!("    {} {}", number, page);
    }

    println!(
        "total: {} (page {}, limit {})",
        response.total_count, response.page, response.limit
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};
    use async_trait::async_trait;
    use news_archive_core::models::HeadlineRow;
    use news_archive_core::store::memory::InMemoryHeadlineStore;

    fn row(date: &str, number: i64, headline: &str) -> HeadlineRow {
        HeadlineRow {
            issue_date: date.to_string(),
            number: Some(number),
            headline: headline.to_string(),
            page: Some(1),
            length: None,
        }
    }

    fn store() -> InMemoryHeadlineStore {
        let s = InMemoryHeadlineStore::new();
        for i in 0..45 {
            s.insert(row(&format!("1966-01-{:02}", i % 28 + 1), i, &format!("Flood report {}", i)));
        }
        s.insert(row("1970-05-01", 1, "Editorial"));
        s
    }

    /// Fails `search`/`latest` and `count`/`count_all` with the given messages.
    struct FailingStore {
        rows_error: Option<&'static str>,
        count_error: Option<&'static str>,
    }

    #[async_trait]
    impl HeadlineStore for FailingStore {
        async fn search(&self, _: &str, _: u32, _: u64) -> Result<Vec<HeadlineRow>> {
            match self.rows_error {
                Some(m) => Err(anyhow!(m)),
                None => Ok(Vec::new()),
            }
        }
        async fn count(&self, _: &str) -> Result<i64> {
            match self.count_error {
                Some(m) => Err(anyhow!(m)),
                None => Ok(0),
            }
        }
        async fn latest(&self, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>> {
            self.search("", limit, offset).await
        }
        async fn count_all(&self) -> Result<i64> {
            self.count("").await
        }
    }

    #[tokio::test]
    async fn test_term_search_pages_and_counts() {
        let s = store();
        let request = normalize(Some(" flood "), Some("20"), Some("3"));
        let resp = execute_search(Some(&s), &request).await.unwrap();
        assert_eq!(resp.total_count, 45);
        assert_eq!(resp.results.len(), 5);
        assert_eq!(resp.page, 3);
        assert_eq!(resp.limit, 20);
    }

    #[tokio::test]
    async fn test_empty_term_lists_latest() {
        let s = store();
        let resp = execute_search(Some(&s), &normalize(None, None, None))
            .await
            .unwrap();
        assert_eq!(resp.total_count, 46);
        assert_eq!(resp.results.len(), 30);
        assert_eq!(resp.results[0].headline, "Editorial");
    }

    #[tokio::test]
    async fn test_missing_store_is_configuration_error() {
        let err = execute_search(None, &normalize(Some("x"), None, None))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Configuration);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database configuration error.");
    }

    #[tokio::test]
    async fn test_syntax_error_is_validation() {
        let s = store();
        let err = execute_search(Some(&s), &normalize(Some("\"flood"), None, None))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Validation);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("check your search terms"));
    }

    #[tokio::test]
    async fn test_count_error_takes_priority() {
        let s = FailingStore {
            rows_error: Some("fts5: syntax error near \"\"\""),
            count_error: Some("database is locked"),
        };
        let err = execute_search(Some(&s), &normalize(Some("x"), None, None))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Overload);
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_single_failure_fails_whole_search() {
        let s = FailingStore {
            rows_error: Some("boom"),
            count_error: None,
        };
        let err = execute_search(Some(&s), &normalize(None, None, None))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::Internal);
        assert_eq!(err.message(), "Failed to perform search.");
    }

    #[test]
    fn test_classify_walks_context_chain() {
        let err = Err::<(), _>(anyhow!("Too Many Requests"))
            .context("running count query")
            .unwrap_err();
        assert_eq!(classify(&err), SearchError::Overload);

        let err = Err::<(), _>(anyhow!("no such column: foo"))
            .context("search")
            .unwrap_err();
        assert_eq!(classify(&err), SearchError::Validation);
    }

    #[test]
    fn test_missing_schema_column_is_not_a_query_error() {
        let err = anyhow!("error returned from database: (code: 1) no such column: h.length");
        assert_eq!(classify(&err), SearchError::Internal);

        let err = anyhow!("no such column: headline");
        assert_ne!(classify(&err), SearchError::Validation);

        let err = anyhow!("error returned from database: (code: 1) no such column: author");
        assert_eq!(classify(&err), SearchError::Validation);
    }

    #[test]
    fn test_classify_pool_timeout() {
        let err = anyhow::Error::new(sqlx::Error::PoolTimedOut);
        assert_eq!(classify(&err), SearchError::Overload);
    }

    #[test]
    fn test_sanitize_backend_message() {
        assert_eq!(sanitize("disk I/O error\nsecond line"), "disk I/O error");
        assert_eq!(sanitize("bad\u{7}bell"), "badbell");
        let long = "x".repeat(500);
        assert_eq!(sanitize(&long).chars().count(), BACKEND_MESSAGE_MAX + 1);
    }
}
