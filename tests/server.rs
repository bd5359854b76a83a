//! End-to-end tests for the HTTP server.
//!
//! Each test starts the router on a free port with its own state and calls
//! it over real HTTP.

use news_archive::archives::ArchiveRegistry;
use news_archive::config::Config;
use news_archive::import::import_rows;
use news_archive::server::{run_server_with_state, AppState};
use news_archive::sqlite_store::SqliteHeadlineStore;
use news_archive::{db, migrate};
use news_archive_core::models::HeadlineRow;
use news_archive_core::store::memory::InMemoryHeadlineStore;
use news_archive_core::store::HeadlineStore;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const MONTH_JS: &str = r####"const ARTICLES = [
  {"path": "1966.01/editorial.md", "date": "1966-01-01", "title": "\"Hold High the Banner\"", "author": "Editorial Board", "page_number": "1", "content": "### Editorial\nEnglish text<hr />Original: 中文"},
  {"path": "1966.01/harvest.md", "date": "1966-01-01", "title": "Harvest", "page_number": "2", "content": "Harvest text"},
  {"path": "1966.01/flood.md", "date": "1966-01-05", "title": "Flood", "page_number": "1", "content": ""}
];"####;

fn row(date: &str, number: i64, headline: &str) -> HeadlineRow {
    HeadlineRow {
        issue_date: date.to_string(),
        number: Some(number),
        headline: headline.to_string(),
        page: Some(1),
        length: Some(100),
    }
}

fn headlines() -> Vec<HeadlineRow> {
    vec![
        row("1966-01-01", 6000, "Flood waters recede"),
        row("1966-01-02", 6001, "Harvest report"),
        row("1966-01-03", 6002, "Flood defences completed"),
    ]
}

fn test_config(tmp: &TempDir) -> Config {
    let root = tmp.path();
    let data = root.join("rmrb");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        root.join("index.js"),
        "window.ARCHIVE_INDEX = {\"1965\": [\"12\"], \"1966\": [\"01\", \"02\"]};",
    )
    .unwrap();
    fs::write(data.join("1966.01.js"), MONTH_JS).unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/headlines.sqlite"

[archives.rmrb]
index = "{root}/index.js"
data = "{root}/rmrb"
title = "The People's Daily - Translations"
source_name = "fangj/rmrb"
source_link = "https://github.com/fangj/rmrb"
"#,
        root = root.display()
    );
    toml::from_str(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

/// Start a server over `headlines` and the archives of `cfg`; returns the
/// base URL.
async fn start(cfg: &Config, headlines: Option<Arc<dyn HeadlineStore>>) -> String {
    let port = find_free_port();
    let bind = format!("127.0.0.1:{}", port);
    let state = AppState::new(headlines, ArchiveRegistry::from_config(cfg));
    tokio::spawn(async move {
        run_server_with_state(&bind, state).await.unwrap();
    });
    wait_for_server(port).await;
    format!("http://127.0.0.1:{}", port)
}

fn memory_store() -> Option<Arc<dyn HeadlineStore>> {
    Some(Arc::new(InMemoryHeadlineStore::with_rows(headlines())))
}

// ─── Search ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_returns_results_and_total() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), memory_store()).await;

    let resp = reqwest::get(format!("{}/api/search?q=flood&limit=1&page=2", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["totalCount"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert!(body["results"][0]["issue_date"].is_string());
}

#[tokio::test]
async fn test_search_defaults_and_latest() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), memory_store()).await;

    let body: Value = reqwest::get(format!("{}/api/search?limit=0&page=-4", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["limit"], 30);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["results"][0]["headline"], "Flood defences completed");
}

#[tokio::test]
async fn test_search_rejects_other_methods() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), memory_store()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/search", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.text().await.unwrap(), "POST method not allowed.");

    let resp = client
        .head(format!("{}/api/search?q=flood", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let resp = client
        .put(format!("{}/api/search", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
    assert_eq!(resp.text().await.unwrap(), "PUT method not allowed.");

    let resp = client
        .get(format!("{}/api/search?q=flood", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_search_syntax_error_is_400() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), memory_store()).await;

    let resp = reqwest::get(format!("{}/api/search?q=%22flood", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Search query syntax error. Please check your search terms."
    );
}

#[tokio::test]
async fn test_search_without_database_is_500() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), None).await;

    let resp = reqwest::get(format!("{}/api/search?q=flood", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Database configuration error.");
}

#[tokio::test]
async fn test_search_against_sqlite() {
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp);
    migrate::run_migrations(&cfg).await.unwrap();
    let pool = db::connect(&cfg).await.unwrap();
    import_rows(&pool, &headlines(), false).await.unwrap();
    let base = start(&cfg, Some(Arc::new(SqliteHeadlineStore::new(pool)))).await;

    let body: Value = reqwest::get(format!("{}/api/search?q=flood", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["totalCount"], 2);

    let resp = reqwest::get(format!("{}/api/search?q=%22flood", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = reqwest::get(format!("{}/api/search", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["results"][0]["number"], 6002);
}

// ─── Archive browser ────────────────────────────────────────────────

#[tokio::test]
async fn test_archive_year_list() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), None).await;

    let resp = reqwest::get(format!("{}/archive/rmrb", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Daily - Translations"));
    assert!(html.contains("href=\"/archive/rmrb?year=1966\""));
    assert!(html.contains("Source of texts: "));
}

#[tokio::test]
async fn test_archive_month_navigation() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), None).await;

    let html = reqwest::get(format!("{}/archive/rmrb?month=1966.01", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("data-nav=\"prev\""));
    assert!(html.contains("month=1965.12"));
    assert!(html.contains("month=1966.02"));
    assert!(html.contains("Day 01"));
    assert!(html.contains("Day 05"));
    assert!(html.contains("Full View"));
}

#[tokio::test]
async fn test_archive_day_and_article_views() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), None).await;

    let html = reqwest::get(format!("{}/archive/rmrb?month=1966.01&day=1", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Page 1"));
    assert!(html.contains("Page 2"));
    assert!(html.contains("\u{201c}Hold High the Banner\u{201d}"));
    assert!(html.contains("by Editorial Board"));
    assert!(html.contains("<span class=\"disabled\">‹ Prev Day</span>"));

    let resp = reqwest::get(format!(
        "{}/archive/rmrb?articlePath=1966.01%2Feditorial.md&lang=cn",
        base
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("中文"));
    assert!(!html.contains("English text"));
    assert!(html.contains("Next Article ›"));
    assert!(html.contains("aria-pressed=\"false\""));
}

#[tokio::test]
async fn test_archive_errors() {
    let tmp = TempDir::new().unwrap();
    let base = start(&test_config(&tmp), None).await;

    let resp = reqwest::get(format!("{}/archive/nope", base)).await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("{}/archive/rmrb?month=1966.02", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Could not load data for 1966.02."));
    assert!(html.contains("Return to Archive Home"));

    let resp = reqwest::get(format!("{}/archive/rmrb?articlePath=oops", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(resp
        .text()
        .await
        .unwrap()
        .contains("Invalid article path format: oops"));

    let resp = reqwest::get(format!("{}/archive/rmrb?month=..%2Frmrb%2F1966.01", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = reqwest::get(format!("{}/archive/rmrb?month=1970.01", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("{}/archive/rmrb?year=1999", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
