use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Headline database. Without it the search endpoint answers with a
    /// configuration error.
    #[serde(default)]
    pub db: Option<DbConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub archives: BTreeMap<String, ArchiveConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8788".to_string()
}

/// One browsable archive (`[archives.<name>]`).
#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    /// Archive index script: a file path or an `http(s)://` URL.
    pub index: String,
    /// Directory or base URL holding the month data files.
    pub data: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_link: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Trusted HTML shown above the year list.
    #[serde(default)]
    pub introduction: Option<String>,
    /// Prefix joined to calendar day links.
    #[serde(default)]
    pub link_base: String,
}

/// True when `location` names a remote resource rather than a local path.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        bail!("server.bind must not be empty");
    }

    if let Some(db) = &config.db {
        if db.path.as_os_str().is_empty() {
            bail!("db.path must not be empty");
        }
    }

    for (name, archive) in &config.archives {
        if name.trim().is_empty() || name.contains('/') {
            bail!("archive name '{}' must be non-empty and must not contain '/'", name);
        }
        if archive.index.trim().is_empty() {
            bail!("archives.{}.index must not be empty", name);
        }
        if archive.data.trim().is_empty() {
            bail!("archives.{}.data must not be empty", name);
        }
    }

    Ok(())
}
