//! Configured archives and their shared runtime state.
//!
//! Each `[archives.<name>]` entry becomes an [`Archive`]: site information
//! for headers and footers, the archive index (loaded on first use and then
//! kept), and a [`MonthCache`] over the archive's month source.

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

use news_archive_core::index::ArchiveIndex;
use news_archive_core::months::{MonthCache, MonthSource};

use crate::config::{is_remote, ArchiveConfig, Config};
use crate::loader::{load_index, month_source_for};

/// Text shown in page headers and footers.
#[derive(Debug, Clone, Default)]
pub struct SiteInfo {
    pub title: String,
    pub source_name: Option<String>,
    pub source_link: Option<String>,
    pub last_updated: Option<String>,
    pub introduction: Option<String>,
}

pub struct Archive {
    pub name: String,
    pub site: SiteInfo,
    /// Prefix for calendar day links.
    pub link_base: String,
    index_location: String,
    index: OnceCell<ArchiveIndex>,
    months: MonthCache,
}

impl Archive {
    pub fn from_config(name: &str, config: &ArchiveConfig) -> Self {
        let site = SiteInfo {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| format!("{} archive", name)),
            source_name: config.source_name.clone(),
            source_link: config.source_link.clone(),
            last_updated: config.last_updated.clone(),
            introduction: config.introduction.clone(),
        };
        Self {
            name: name.to_string(),
            site,
            link_base: config.link_base.clone(),
            index_location: config.index.clone(),
            index: OnceCell::new(),
            months: MonthCache::new(month_source_for(&config.data)),
        }
    }

    /// An archive with an already parsed index.
    pub fn with_index(
        name: &str,
        site: SiteInfo,
        index: ArchiveIndex,
        source: Arc<dyn MonthSource>,
    ) -> Self {
        Self {
            name: name.to_string(),
            site,
            link_base: String::new(),
            index_location: String::new(),
            index: OnceCell::new_with(Some(index)),
            months: MonthCache::new(source),
        }
    }

    /// The archive index, loading it on first access. A failed load is
    /// retried on the next call.
    pub async fn index(&self) -> Result<&ArchiveIndex> {
        self.index
            .get_or_try_init(|| load_index(&self.index_location))
            .await
    }

    pub fn months(&self) -> &MonthCache {
        &self.months
    }
}

/// Archive name → archive.
#[derive(Default)]
pub struct ArchiveRegistry {
    archives: BTreeMap<String, Arc<Archive>>,
}

impl ArchiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for (name, archive) in &config.archives {
            registry.register(Archive::from_config(name, archive));
        }
        registry
    }

    pub fn register(&mut self, archive: Archive) {
        self.archives.insert(archive.name.clone(), Arc::new(archive));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Archive>> {
        self.archives.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.archives.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }
}

async fn location_status(client: &reqwest::Client, location: &str) -> &'static str {
    if is_remote(location) {
        match client.head(location).send().await {
            Ok(resp) if resp.status().is_success() => "OK",
            Ok(_) => "HTTP ERROR",
            Err(_) => "UNREACHABLE",
        }
    } else if tokio::fs::try_exists(location).await.unwrap_or(false) {
        "OK"
    } else {
        "MISSING"
    }
}

pub async fn list_archives(config: &Config) -> Result<()> {
    if config.archives.is_empty() {
        println!("No archives configured.");
        return Ok(());
    }

    let client = reqwest::Client::new();
    println!("{:<16} {:<12} {:<12} TITLE", "ARCHIVE", "INDEX", "DATA");
    for (name, archive) in &config.archives {
        let index_status = location_status(&client, &archive.index).await;
        let data_status = location_status(&client, &archive.data).await;
        println!(
            "{:<16} {:<12} {:<12} {}",
            name,
            index_status,
            data_status,
            archive.title.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
