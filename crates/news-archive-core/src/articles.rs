//! Per-day article selection, ordering, and adjacency.
//!
//! The same order is used for the day listing, the full-day view, and
//! previous/next article links:
//!
//! 1. parsed page number, ascending;
//! 2. articles without a usable page number after all numbered ones;
//! 3. path, ascending, whenever the page numbers tie or are both missing.

use std::cmp::Ordering;

use crate::models::Article;
use crate::query::parse_int_prefix;

/// Leading integer of the article's page number, if any.
pub fn page_of(article: &Article) -> Option<i64> {
    article.page_number.as_deref().and_then(parse_int_prefix)
}

/// Total order used for every per-day listing.
pub fn compare_for_day(a: &Article, b: &Article) -> Ordering {
    let by_page = match (page_of(a), page_of(b)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_page.then_with(|| a.path.cmp(&b.path))
}

/// Articles dated exactly `date` (ISO string equality), in input order.
pub fn for_day<'a>(articles: &'a [Article], date: &str) -> Vec<&'a Article> {
    articles.iter().filter(|a| a.date == date).collect()
}

/// Articles dated `date`, sorted with [`compare_for_day`].
pub fn sorted_for_day<'a>(articles: &'a [Article], date: &str) -> Vec<&'a Article> {
    let mut day = for_day(articles, date);
    day.sort_by(|a, b| compare_for_day(a, b));
    day
}

/// Previous and next articles around `current_path` in an already sorted day.
///
/// Both are `None` when the path is not part of the day.
pub fn adjacent_in_day<'a>(
    sorted_day: &[&'a Article],
    current_path: &str,
) -> (Option<&'a Article>, Option<&'a Article>) {
    let Some(pos) = sorted_day.iter().position(|a| a.path == current_path) else {
        return (None, None);
    };
    let prev = pos.checked_sub(1).and_then(|i| sorted_day.get(i)).copied();
    let next = sorted_day.get(pos + 1).copied();
    (prev, next)
}

/// Look up an article by its unique path.
pub fn find_by_path<'a>(articles: &'a [Article], path: &str) -> Option<&'a Article> {
    articles.iter().find(|a| a.path == path)
}

/// Group a sorted day into runs that share a page number.
pub fn group_by_page<'a>(sorted_day: &[&'a Article]) -> Vec<(Option<i64>, Vec<&'a Article>)> {
    let mut groups: Vec<(Option<i64>, Vec<&'a Article>)> = Vec::new();
    for article in sorted_day {
        let page = page_of(article);
        if let Some((current, members)) = groups.last_mut() {
            if *current == page {
                members.push(*article);
                continue;
            }
        }
        groups.push((page, vec![*article]));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn art(path: &str, date: &str, page: Option<&str>) -> Article {
        Article {
            path: path.to_string(),
            date: date.to_string(),
            title: Some(path.to_string()),
            author: None,
            page_number: page.map(str::to_string),
            content: String::new(),
        }
    }

    fn paths(items: &[&Article]) -> Vec<String> {
        items.iter().map(|a| a.path.clone()).collect()
    }

    #[test]
    fn test_sort_pages_then_missing_by_path() {
        let arts = vec![
            art("m/p3", "1966-01-01", Some("3")),
            art("m/path-b", "1966-01-01", None),
            art("m/p1", "1966-01-01", Some("1")),
            art("m/path-a", "1966-01-01", None),
        ];
        let sorted = sorted_for_day(&arts, "1966-01-01");
        assert_eq!(paths(&sorted), vec!["m/p1", "m/p3", "m/path-a", "m/path-b"]);
    }

    #[test]
    fn test_sort_ties_break_by_path() {
        let arts = vec![
            art("m/z", "1966-01-01", Some("2")),
            art("m/a", "1966-01-01", Some("2")),
            art("m/unparsable", "1966-01-01", Some("n/a")),
            art("m/b", "1966-01-01", Some("2 (cont.)")),
        ];
        let sorted = sorted_for_day(&arts, "1966-01-01");
        assert_eq!(paths(&sorted), vec!["m/a", "m/b", "m/z", "m/unparsable"]);
    }

    #[test]
    fn test_sort_is_independent_of_load_order() {
        let mut arts = vec![
            art("m/c", "1966-01-01", Some("1")),
            art("m/a", "1966-01-01", None),
            art("m/b", "1966-01-01", Some("1")),
        ];
        let first = paths(&sorted_for_day(&arts, "1966-01-01"));
        arts.reverse();
        let second = paths(&sorted_for_day(&arts, "1966-01-01"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_for_day_exact_match() {
        let arts = vec![
            art("m/a", "1966-01-01", None),
            art("m/b", "1966-01-10", None),
            art("m/c", "1966-01-1", None),
        ];
        assert_eq!(paths(&for_day(&arts, "1966-01-01")), vec!["m/a"]);
        assert!(for_day(&arts, "1966-02-01").is_empty());
    }

    #[test]
    fn test_adjacent_in_day() {
        let arts = vec![
            art("a", "1966-01-01", Some("1")),
            art("b", "1966-01-01", Some("2")),
            art("c", "1966-01-01", Some("3")),
        ];
        let sorted = sorted_for_day(&arts, "1966-01-01");

        let (p, n) = adjacent_in_day(&sorted, "a");
        assert_eq!((p.map(|a| a.path.as_str()), n.map(|a| a.path.as_str())), (None, Some("b")));
        let (p, n) = adjacent_in_day(&sorted, "b");
        assert_eq!((p.map(|a| a.path.as_str()), n.map(|a| a.path.as_str())), (Some("a"), Some("c")));
        let (p, n) = adjacent_in_day(&sorted, "c");
        assert_eq!((p.map(|a| a.path.as_str()), n.map(|a| a.path.as_str())), (Some("b"), None));

        assert_eq!(adjacent_in_day(&sorted, "missing"), (None, None));
    }

    #[test]
    fn test_group_by_page() {
        let arts = vec![
            art("a", "d", Some("1")),
            art("b", "d", Some("1")),
            art("c", "d", Some("4")),
            art("d", "d", None),
        ];
        let sorted = sorted_for_day(&arts, "d");
        let groups = group_by_page(&sorted);
        let shape: Vec<(Option<i64>, usize)> = groups.iter().map(|(p, m)| (*p, m.len())).collect();
        assert_eq!(shape, vec![(Some(1), 2), (Some(4), 1), (None, 1)]);
    }
}
