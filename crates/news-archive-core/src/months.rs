//! Month data loading and the per-archive month cache.
//!
//! A [`MonthSource`] knows where an archive's month files live (a local
//! directory, a web server, a test fixture). [`MonthCache`] sits in front of
//! it and keeps every month it has loaded for the lifetime of the process.
//! Entries are never evicted.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::index::MonthKey;
use crate::models::Article;

/// Capability to fetch the articles of one month.
#[async_trait]
pub trait MonthSource: Send + Sync {
    /// Where the data for `month` is read from, for log and error messages.
    fn locate(&self, month: &MonthKey) -> String;

    /// Load and parse the articles of `month`.
    async fn load(&self, month: &MonthKey) -> Result<Vec<Article>>;
}

/// Month label → loaded articles, in front of a [`MonthSource`].
pub struct MonthCache {
    source: Arc<dyn MonthSource>,
    months: RwLock<HashMap<String, Arc<Vec<Article>>>>,
}

impl MonthCache {
    pub fn new(source: Arc<dyn MonthSource>) -> Self {
        Self {
            source,
            months: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &dyn MonthSource {
        self.source.as_ref()
    }

    /// Articles of `month` if they are already loaded.
    pub fn cached(&self, month: &MonthKey) -> Option<Arc<Vec<Article>>> {
        self.months
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&month.to_string())
            .cloned()
    }

    /// Return the cached articles of `month`, loading them on first access.
    ///
    /// Failed loads are not cached; the next request tries again.
    pub async fn get_or_load(&self, month: &MonthKey) -> Result<Arc<Vec<Article>>> {
        if let Some(hit) = self.cached(month) {
            return Ok(hit);
        }
        let loaded = Arc::new(self.source.load(month).await?);
        let mut months = self.months.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent load of the same month may have finished first; keep
        // whichever landed first so every caller shares one copy.
        let entry = months
            .entry(month.to_string())
            .or_insert_with(|| Arc::clone(&loaded));
        Ok(Arc::clone(entry))
    }

    /// Number of months currently held.
    pub fn len(&self) -> usize {
        self.months.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
