//! Month data and archive index loading.
//!
//! Two [`MonthSource`] implementations cover the ways an archive publishes
//! its month files:
//!
//! | Source | Reads |
//! |--------|-------|
//! | [`LocalMonthSource`] | `<dir>/<month>.js`, falling back to `<dir>/<month>.js.gz` |
//! | [`HttpMonthSource`] | `<base>/<month>.js.gz`, gunzipped after download |
//!
//! [`month_source_for`] picks one from the configured data location.
//! Load failures are turned into reader-facing messages by
//! [`describe_load_error`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use news_archive_core::index::{ArchiveIndex, MonthKey};
use news_archive_core::jsdata::{parse_articles, parse_index};
use news_archive_core::models::Article;
use news_archive_core::months::MonthSource;

use crate::config::is_remote;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A non-success HTTP status while fetching archive data.
#[derive(Debug)]
pub struct HttpStatusError {
    pub url: String,
    pub status: u16,
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP error! status: {} for {}", self.status, self.url)
    }
}

impl std::error::Error for HttpStatusError {}

/// Month files in a local directory.
pub struct LocalMonthSource {
    dir: PathBuf,
}

impl LocalMonthSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn plain_path(&self, month: &MonthKey) -> PathBuf {
        self.dir.join(format!("{}.js", month))
    }

    fn gz_path(&self, month: &MonthKey) -> PathBuf {
        self.dir.join(format!("{}.js.gz", month))
    }
}

#[async_trait]
impl MonthSource for LocalMonthSource {
    fn locate(&self, month: &MonthKey) -> String {
        self.plain_path(month).display().to_string()
    }

    async fn load(&self, month: &MonthKey) -> Result<Vec<Article>> {
        let plain = self.plain_path(month);
        let text = if tokio::fs::try_exists(&plain).await.unwrap_or(false) {
            tokio::fs::read_to_string(&plain)
                .await
                .with_context(|| format!("Could not read local data file: {}", plain.display()))?
        } else {
            let gz = self.gz_path(month);
            let bytes = tokio::fs::read(&gz).await.with_context(|| {
                format!(
                    "Could not load local data file: {}. Check if the file exists.",
                    plain.display()
                )
            })?;
            decode_text(&bytes).with_context(|| format!("Could not decompress {}", gz.display()))?
        };

        let articles = parse_articles(&text)?;
        tracing::info!(month = %month, articles = articles.len(), path = %plain.display(), "loaded month from disk");
        Ok(articles)
    }
}

/// Gzipped month files on a web server.
pub struct HttpMonthSource {
    base: String,
    client: reqwest::Client,
}

impl HttpMonthSource {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MonthSource for HttpMonthSource {
    fn locate(&self, month: &MonthKey) -> String {
        format!("{}/{}.js.gz", self.base, month)
    }

    async fn load(&self, month: &MonthKey) -> Result<Vec<Article>> {
        let url = self.locate(month);
        let bytes = fetch_bytes(&self.client, &url).await?;
        let text = decode_text(&bytes).with_context(|| format!("Could not decompress {}", url))?;
        let articles = parse_articles(&text)?;
        tracing::info!(month = %month, articles = articles.len(), url = %url, "fetched month from server");
        Ok(articles)
    }
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?;
    let status = response.status();
    if !status.is_success() {
        return Err(HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Reading body of {} failed", url))?;
    Ok(bytes.to_vec())
}

/// Gunzip `bytes` when they carry the gzip magic number; otherwise treat
/// them as already-decoded UTF-8 (a server may have decompressed already).
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        GzDecoder::new(bytes).read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// Month source for a configured data location.
pub fn month_source_for(data: &str) -> Arc<dyn MonthSource> {
    if is_remote(data) {
        Arc::new(HttpMonthSource::new(data))
    } else {
        Arc::new(LocalMonthSource::new(data))
    }
}

/// Load an archive index script from a path or URL.
pub async fn load_index(location: &str) -> Result<ArchiveIndex> {
    let text = if is_remote(location) {
        let bytes = fetch_bytes(&reqwest::Client::new(), location).await?;
        decode_text(&bytes)?
    } else {
        tokio::fs::read_to_string(location)
            .await
            .with_context(|| format!("Failed to read archive index: {}", location))?
    };
    let index = parse_index(&text).with_context(|| format!("Invalid archive index: {}", location))?;
    tracing::info!(location, years = index.years().len(), "archive index loaded");
    Ok(index)
}

/// Reader-facing explanation of a failed month load.
pub fn describe_load_error(month: &MonthKey, err: &anyhow::Error) -> String {
    let reason = if err.chain().any(|c| c.is::<HttpStatusError>())
        || err.chain().any(|c| {
            c.downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        }) {
        "The file might be missing or inaccessible on the server."
    } else if err.chain().any(|c| c.is::<reqwest::Error>()) {
        "A network error occurred."
    } else if err.chain().any(|c| c.is::<serde_json::Error>()) {
        "The data file has incorrect JSON format."
    } else {
        "An unexpected error occurred during loading or decompression."
    };
    format!("Could not load data for {}. {}", month, reason)
}
