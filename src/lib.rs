//! # News Archive
//!
//! A headline search API and a server-rendered browser for translated
//! newspaper archives.
//!
//! Headlines live in SQLite with an FTS5 index and are served by
//! `GET /api/search`. Archive texts stay where they are published (a local
//! directory or a static web host) as per-month data scripts; the browser
//! loads them on demand, caches each month for the life of the process and
//! renders year, month, day and article views with previous/next
//! navigation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ import (JSON)│──▶│ SQLite+FTS5  │──▶│ /api/search  │
//! └──────────────┘   └──────────────┘   └──────────────┘
//!
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ month files  │──▶│  MonthCache  │──▶│ /archive/... │
//! │ local / HTTP │   │ + index nav  │   │  (maud HTML) │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! newsarc init                          # create database
//! newsarc import headlines.json         # load headline rows
//! newsarc search "flood" --limit 10
//! newsarc index build ./data --kind months --output ./data/index.js
//! newsarc serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite headline store |
//! | [`import`] | Headline import |
//! | [`search`] | Search execution and error classification |
//! | [`loader`] | Month data and index loading |
//! | [`index_build`] | Archive index generation |
//! | [`archives`] | Configured archives |
//! | [`browse`] | Browser view models |
//! | [`render`] | HTML rendering |
//! | [`server`] | HTTP server |

pub mod archives;
pub mod browse;
pub mod config;
pub mod db;
pub mod import;
pub mod index_build;
pub mod loader;
pub mod migrate;
pub mod render;
pub mod search;
pub mod server;
pub mod sqlite_store;
