//! Search parameter normalization.
//!
//! Raw `q`, `limit`, and `page` values come straight from an untrusted query
//! string. Normalization never fails: anything unusable is replaced by a
//! default so a public search box degrades gracefully instead of erroring.
//!
//! | Input | Rule |
//! |-------|------|
//! | `q` | trimmed; empty when absent |
//! | `limit` | leading integer; not a number, `<= 0` or `> MAX_LIMIT` → `DEFAULT_LIMIT` |
//! | `page` | leading integer; not a number or `<= 0` → `1` |

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;

/// Rows per page when the client sends nothing usable.
pub const DEFAULT_LIMIT: u32 = 30;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 500;

/// Query string parameters exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl RawSearchParams {
    /// Parse a raw query string. A repeated key keeps its first value.
    pub fn parse(query: &str) -> Self {
        decode_first_values(query)
    }

    pub fn normalize(&self) -> SearchRequest {
        normalize(
            self.q.as_deref(),
            self.limit.as_deref(),
            self.page.as_deref(),
        )
    }
}

/// Decode a query string into `T`, keeping only the first value of each
/// key. Other keys are unaffected by a repeat.
pub fn decode_first_values<T: DeserializeOwned + Default>(query: &str) -> T {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
    let mut seen = HashSet::new();
    let first: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect();
    serde_urlencoded::to_string(&first)
        .ok()
        .and_then(|encoded| serde_urlencoded::from_str(&encoded).ok())
        .unwrap_or_default()
}

/// A bounded, ready-to-execute search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed search term; empty means "latest headlines".
    pub term: String,
    /// 1-based page number.
    pub page: u32,
    /// Page size in `1..=MAX_LIMIT`.
    pub limit: u32,
}

impl SearchRequest {
    /// Number of rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// True when the request should use the full-text path.
    pub fn has_term(&self) -> bool {
        !self.term.is_empty()
    }
}

/// Normalize raw search parameters into a [`SearchRequest`].
pub fn normalize(q: Option<&str>, limit: Option<&str>, page: Option<&str>) -> SearchRequest {
    let term = q.map(str::trim).unwrap_or_default().to_string();

    let limit = match parse_int_prefix(limit.unwrap_or("30")) {
        Some(n) if n > 0 && n <= i64::from(MAX_LIMIT) => n as u32,
        _ => DEFAULT_LIMIT,
    };

    let page = match parse_int_prefix(page.unwrap_or("1")) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    };

    SearchRequest { term, page, limit }
}

/// Parse the leading integer of a string the way a lenient form parser does:
/// leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit, and no digits at all means "not a number".
///
/// `"20abc"` → `Some(20)`, `" -3"` → `Some(-3)`, `"abc"` → `None`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(b - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}
