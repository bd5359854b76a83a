//! Archive index generation (`newsarc index build`).
//!
//! | Kind | Scans | Produces |
//! |------|-------|----------|
//! | `months` | `<root>/**/YYYY.MM.js[.gz]` | `{ "1966": ["01", "02"] }` |
//! | `calendar` | `<root>/<YYYY…>/YYYY.MM.DD.html` | `{ "1939 SH": { "01": [{day, path}] } }` |
//!
//! In calendar mode every directory whose name starts with four digits is
//! its own year label, suffix included, and day paths are relative to
//! `<root>`.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

use news_archive_core::index::{ArchiveIndex, DayLink, MonthEntry, YearEntry};
use news_archive_core::jsdata::index_script;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexKind {
    /// Month data files (`YYYY.MM.js` or `YYYY.MM.js.gz`).
    Months,
    /// Per-day issue pages grouped in year directories.
    Calendar,
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// `("1966", "01")` for `1966.01.js` or `1966.01.js.gz`.
fn month_file(name: &str) -> Option<(&str, &str)> {
    let stem = name
        .strip_suffix(".js.gz")
        .or_else(|| name.strip_suffix(".js"))?;
    let (year, month) = stem.split_once('.')?;
    (is_digits(year, 4) && is_digits(month, 2)).then_some((year, month))
}

/// `("01", "03")` for `1939.01.03.html`.
fn day_page(name: &str) -> Option<(&str, &str)> {
    let stem = name.strip_suffix(".html")?;
    let mut parts = stem.split('.');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || !is_digits(year, 4) || !is_digits(month, 2) || !is_digits(day, 2)
    {
        return None;
    }
    Some((month, day))
}

fn is_year_dir(name: &str) -> bool {
    name.get(..4).is_some_and(|prefix| is_digits(prefix, 4))
}

/// Build an index of month data files under `root`.
pub fn build_month_index(root: &Path) -> Result<ArchiveIndex> {
    let mut years: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some((year, month)) = month_file(&name) {
            years
                .entry(year.to_string())
                .or_default()
                .push(month.to_string());
        }
    }

    Ok(ArchiveIndex::new(
        years
            .into_iter()
            .map(|(year, mut months)| {
                months.sort();
                months.dedup();
                (year, YearEntry::Months(months))
            })
            .collect(),
    ))
}

/// Build a calendar index of per-day pages in year directories under `root`.
pub fn build_calendar_index(root: &Path) -> Result<ArchiveIndex> {
    let mut years: BTreeMap<String, BTreeMap<String, Vec<DayLink>>> = BTreeMap::new();

    for entry in WalkDir::new(root).min_depth(2).max_depth(2) {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(dir_name) = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
        else {
            continue;
        };
        if !is_year_dir(&dir_name) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        let Some((month, day)) = day_page(&file_name) else {
            continue;
        };
        years
            .entry(dir_name.clone())
            .or_default()
            .entry(month.to_string())
            .or_default()
            .push(DayLink {
                day: day.to_string(),
                path: format!("{}/{}", dir_name, file_name),
            });
    }

    Ok(ArchiveIndex::new(
        years
            .into_iter()
            .map(|(year, months)| {
                let months = months
                    .into_iter()
                    .map(|(month, mut days)| {
                        days.sort_by(|a, b| a.day.cmp(&b.day));
                        (month, MonthEntry::Links(days))
                    })
                    .collect();
                (year, YearEntry::Calendar(months))
            })
            .collect(),
    ))
}

pub fn run_index_build(root: &Path, kind: IndexKind, output: Option<&Path>) -> Result<()> {
    if !root.is_dir() {
        bail!("Index root is not a directory: {}", root.display());
    }

    let index = match kind {
        IndexKind::Months => build_month_index(root)?,
        IndexKind::Calendar => build_calendar_index(root)?,
    };
    let script = index_script(&index)?;

    match output {
        Some(path) => {
            std::fs::write(path, &script)
                .with_context(|| format!("Failed to write index: {}", path.display()))?;
            println!("Generated {} with {} years.", path.display(), index.years().len());
        }
        None => print!("{}", script),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_patterns() {
        assert_eq!(month_file("1966.01.js"), Some(("1966", "01")));
        assert_eq!(month_file("1966.01.js.gz"), Some(("1966", "01")));
        assert_eq!(month_file("index.js"), None);
        assert_eq!(month_file("1966.1.js"), None);

        assert_eq!(day_page("1939.01.03.html"), Some(("01", "03")));
        assert_eq!(day_page("1939.01.3.html"), None);
        assert_eq!(day_page("index.html"), None);

        assert!(is_year_dir("1939 SH"));
        assert!(is_year_dir("1940"));
        assert!(!is_year_dir("support"));
    }

    #[test]
    fn test_build_month_index() {
        let tmp = TempDir::new().unwrap();
        for name in ["1967.02.js.gz", "1966.12.js", "1966.01.js", "1966.01.js.gz", "index.js"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        let index = build_month_index(tmp.path()).unwrap();
        assert_eq!(index.years(), vec!["1966", "1967"]);
        assert_eq!(index.months("1966").unwrap(), vec!["01", "12"]);
        assert!(!index.is_calendar("1966"));
    }

    #[test]
    fn test_build_calendar_index() {
        let tmp = TempDir::new().unwrap();
        let sh = tmp.path().join("1939 SH");
        fs::create_dir_all(&sh).unwrap();
        fs::write(sh.join("1939.01.05.html"), "").unwrap();
        fs::write(sh.join("1939.01.03.html"), "").unwrap();
        fs::write(sh.join("notes.txt"), "").unwrap();
        fs::create_dir_all(tmp.path().join("support")).unwrap();
        fs::write(tmp.path().join("support").join("1939.01.01.html"), "").unwrap();

        let index = build_calendar_index(tmp.path()).unwrap();
        assert_eq!(index.years(), vec!["1939 SH"]);
        let days = index.days("1939 SH", "01");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, "03");
        assert_eq!(days[0].path, "1939 SH/1939.01.03.html");
    }
}
