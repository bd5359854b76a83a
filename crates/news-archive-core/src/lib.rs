//! # News Archive Core
//!
//! Shared logic for News Archive: search parameter normalization, archive
//! index navigation, per-day article ordering, content formatting, and the
//! store and month-source traits the application implements.
//!
//! This crate contains no tokio, sqlx, filesystem I/O, or other
//! native-only dependencies, so the navigation rules can be reused by a
//! browser build of the archive.

pub mod articles;
pub mod calendar;
pub mod content;
pub mod index;
pub mod jsdata;
pub mod models;
pub mod months;
pub mod nav;
pub mod query;
pub mod store;
