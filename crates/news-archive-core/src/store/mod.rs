//! Headline storage abstraction.
//!
//! The [`HeadlineStore`] trait is everything the search endpoint needs from
//! a data source: a paged full-text query, a paged "latest" query, and
//! their counts. The SQLite implementation lives in the application crate;
//! [`memory::InMemoryHeadlineStore`] backs tests.
//!
//! Implementations must be `Send + Sync` to be shared across requests.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::HeadlineRow;

/// Read access to the headline index.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`search`](HeadlineStore::search) | Rows matching a full-text term, best match first |
/// | [`count`](HeadlineStore::count) | Number of rows matching a term |
/// | [`latest`](HeadlineStore::latest) | Newest issues first, then issue number |
/// | [`count_all`](HeadlineStore::count_all) | Total number of rows |
#[async_trait]
pub trait HeadlineStore: Send + Sync {
    /// Full-text search. `term` uses the backend's match syntax and may be
    /// rejected as malformed.
    async fn search(&self, term: &str, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>>;

    async fn count(&self, term: &str) -> Result<i64>;

    /// Newest rows, ordered by issue date descending then number ascending.
    async fn latest(&self, limit: u32, offset: u64) -> Result<Vec<HeadlineRow>>;

    async fn count_all(&self) -> Result<i64>;
}
