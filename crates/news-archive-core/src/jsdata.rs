//! Parsing of the JavaScript data files published alongside the archive.
//!
//! Month files and the archive index are JSON wrapped in a variable
//! assignment so a static page can load them with a `<script>` tag:
//!
//! ```text
//! const ARTICLES = [ ... ];
//! window.ARCHIVE_INDEX = { ... };
//! ```

use anyhow::{bail, Context, Result};

use crate::index::ArchiveIndex;
use crate::models::Article;

/// Strip a single leading `const|let|var NAME =` or `window.NAME =`
/// assignment and a trailing `;`, returning the JSON payload.
///
/// Input without an assignment is returned trimmed, so plain JSON files work
/// too.
pub fn strip_assignment(source: &str) -> &str {
    let text = source.trim().trim_start_matches('\u{feff}');
    let body = assignment_body(text).unwrap_or(text);
    body.trim().trim_end_matches(';').trim_end()
}

fn assignment_body(text: &str) -> Option<&str> {
    let rest = ["const ", "let ", "var ", "window."]
        .iter()
        .find_map(|kw| text.strip_prefix(kw))?;
    let (name, body) = rest.split_once('=')?;
    let name = name.trim();
    let is_identifier = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    is_identifier.then_some(body)
}

/// Parse a month data file into its articles.
pub fn parse_articles(source: &str) -> Result<Vec<Article>> {
    let json = strip_assignment(source);
    if json.is_empty() {
        bail!("month data is empty");
    }
    serde_json::from_str(json).context("month data is not a valid article array")
}

/// Parse an archive index file.
pub fn parse_index(source: &str) -> Result<ArchiveIndex> {
    let json = strip_assignment(source);
    if json.is_empty() {
        bail!("archive index is empty");
    }
    serde_json::from_str(json).context("archive index is not a valid year map")
}

/// Render an archive index as a script that assigns `window.ARCHIVE_INDEX`.
pub fn index_script(index: &ArchiveIndex) -> Result<String> {
    let json = serde_json::to_string_pretty(index).context("failed to serialize archive index")?;
    Ok(format!("window.ARCHIVE_INDEX = {};\n", json))
}
