//! Archive browser view models.
//!
//! [`resolve_view`] turns a [`NavigationTarget`] into a [`ViewModel`]: the
//! page content plus the navigation state (back, previous, next) that
//! belongs to it. Navigation state is computed per request and carried in
//! the view model, so concurrent readers never share it.
//!
//! Failures never escape: a missing index, an unloadable month, or an
//! unknown article becomes an error page with a link home.

use std::sync::Arc;

use news_archive_core::articles::{adjacent_in_day, find_by_path, group_by_page, sorted_for_day};
use news_archive_core::calendar::{month_grid, MonthGrid};
use news_archive_core::content::{format_content, smarten_quotes, FormattedContent, DELIMITER};
use news_archive_core::index::{
    days_in_month, pad_day, sibling_day, sibling_month, sibling_year, split_year_label,
    ArchiveIndex, Direction, MonthKey,
};
use news_archive_core::models::Article;
use news_archive_core::nav::{NavigationTarget, View};

use crate::archives::Archive;
use crate::loader::describe_load_error;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// A labelled link to another browser location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub target: NavigationTarget,
}

impl NavLink {
    fn new(label: impl Into<String>, target: NavigationTarget) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

/// Back/previous/next links of one rendered view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub back: Option<NavLink>,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
    /// Unit named by disabled controls ("Year", "Month", "Day", "Article").
    pub unit: &'static str,
}

/// Why a view could not be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Invalid,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearLink {
    pub label: String,
    pub year: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLink {
    pub name: String,
    pub month: MonthKey,
}

/// Articles sharing a page number.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub page: Option<i64>,
    pub articles: Vec<ArticleSummary>,
}

impl PageGroup {
    /// `"Page 3"`, or `"Page Unknown"` without a usable number.
    pub fn heading(&self) -> String {
        match self.page {
            Some(page) => format!("Page {}", page),
            None => "Page Unknown".to_string(),
        }
    }
}

/// An article as listed or shown in full within a day.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSummary {
    pub path: String,
    pub title: String,
    pub author: Option<String>,
    pub page_number: Option<String>,
    /// Present in the full-day view only.
    pub content: Option<Option<FormattedContent>>,
}

impl ArticleSummary {
    fn from_article(article: &Article, with_content: bool) -> Self {
        Self {
            path: article.path.clone(),
            title: smarten_quotes(article.title.as_deref().unwrap_or("Untitled")),
            author: article
                .author
                .as_deref()
                .filter(|a| !a.is_empty())
                .map(smarten_quotes),
            page_number: article.page_number.clone().filter(|p| !p.is_empty()),
            content: with_content.then(|| format_content(&article.content)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Years {
        years: Vec<YearLink>,
        introduction: Option<String>,
    },
    Months {
        year: String,
        months: Vec<MonthLink>,
    },
    Calendar {
        year: String,
        months: Vec<MonthGrid>,
        link_base: String,
    },
    Days {
        month: MonthKey,
        days: Vec<String>,
    },
    DayArticles {
        month: MonthKey,
        day: String,
        date: String,
        groups: Vec<PageGroup>,
    },
    FullDay {
        date: String,
        groups: Vec<PageGroup>,
    },
    Article {
        article: ArticleSummary,
        date: String,
        content: Option<FormattedContent>,
        hide_english: bool,
        toggle: NavigationTarget,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Document title.
    pub title: String,
    pub page: Page,
    pub nav: NavState,
}

impl ViewModel {
    fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            title: "Archive".to_string(),
            page: Page::Error {
                kind,
                message: message.into(),
            },
            nav: NavState::default(),
        }
    }
}

/// Resolve the view for `target` in `archive`.
pub async fn resolve_view(archive: &Archive, target: &NavigationTarget) -> ViewModel {
    let view = target.view();
    tracing::debug!(archive = %archive.name, ?view, "resolving view");

    let index = match archive.index().await {
        Ok(index) => index,
        Err(e) => {
            tracing::error!(archive = %archive.name, error = %format!("{:#}", e), "archive index unavailable");
            return ViewModel::error(
                ErrorKind::Unavailable,
                "Archive index is not loaded. Cannot display the archive.",
            );
        }
    };

    match view {
        View::Home => year_list(archive, index),
        View::Year { year } => year_view(archive, index, &year),
        View::Month { month } => match load_month(archive, index, &month).await {
            Ok(articles) => day_list(index, &month, &articles),
            Err(vm) => vm,
        },
        View::Day { month, day } => match load_month(archive, index, &month).await {
            Ok(articles) => day_articles(&month, &day, &articles, false),
            Err(vm) => vm,
        },
        View::FullDay { month, day } => match load_month(archive, index, &month).await {
            Ok(articles) => day_articles(&month, &day, &articles, true),
            Err(vm) => vm,
        },
        View::Article {
            month,
            path,
            hide_english,
        } => match load_month(archive, index, &month).await {
            Ok(articles) => article_view(&month, &path, hide_english, &articles),
            Err(vm) => vm,
        },
        View::Invalid { message } => ViewModel::error(ErrorKind::Invalid, message),
    }
}

/// Load a month the index lists. Anything else is rejected before the
/// source or the cache sees it.
async fn load_month(
    archive: &Archive,
    index: &ArchiveIndex,
    month: &MonthKey,
) -> Result<Arc<Vec<Article>>, ViewModel> {
    let listed = index
        .months(&month.year)
        .is_some_and(|months| months.contains(&month.month.as_str()));
    if !listed {
        tracing::debug!(archive = %archive.name, month = %month, "month not in index");
        return Err(ViewModel::error(
            ErrorKind::NotFound,
            format!("No data found for the month {}.", month),
        ));
    }

    let cache = archive.months();
    if cache.cached(month).is_some() {
        tracing::debug!(archive = %archive.name, month = %month, "month cache hit");
    }
    cache.get_or_load(month).await.map_err(|e| {
        tracing::warn!(
            archive = %archive.name,
            month = %month,
            location = %cache.source().locate(month),
            error = %format!("{:#}", e),
            "month load failed"
        );
        ViewModel::error(ErrorKind::Unavailable, describe_load_error(month, &e))
    })
}

fn year_list(archive: &Archive, index: &ArchiveIndex) -> ViewModel {
    let years: Vec<YearLink> = index
        .years()
        .into_iter()
        .map(|label| {
            let (year, location) = split_year_label(label);
            YearLink {
                label: label.to_string(),
                year: year.to_string(),
                location: location.map(str::to_string),
            }
        })
        .collect();

    if years.is_empty() {
        return ViewModel::error(ErrorKind::NotFound, "No archive data found.");
    }

    ViewModel {
        title: archive.site.title.clone(),
        page: Page::Years {
            years,
            introduction: archive.site.introduction.clone(),
        },
        nav: NavState {
            unit: "Year",
            ..NavState::default()
        },
    }
}

fn month_name(month: &str) -> String {
    month
        .parse::<usize>()
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_NAMES.get(i))
        .map(|name| name.to_string())
        .unwrap_or_else(|| month.to_string())
}

fn year_view(archive: &Archive, index: &ArchiveIndex, year: &str) -> ViewModel {
    let Some(months) = index.months(year) else {
        return ViewModel::error(
            ErrorKind::NotFound,
            format!("No data found for the year {}.", year),
        );
    };

    let nav = NavState {
        back: Some(NavLink::new("« All Years", NavigationTarget::home())),
        prev: sibling_year(index, year, Direction::Prev)
            .map(|y| NavLink::new(format!("‹ {}", y), NavigationTarget::year(y))),
        next: sibling_year(index, year, Direction::Next)
            .map(|y| NavLink::new(format!("{} ›", y), NavigationTarget::year(y))),
        unit: "Year",
    };

    let page = if index.is_calendar(year) {
        Page::Calendar {
            year: year.to_string(),
            months: months
                .iter()
                .filter_map(|m| month_grid(year, m, &index.days(year, m)))
                .collect(),
            link_base: archive.link_base.clone(),
        }
    } else {
        Page::Months {
            year: year.to_string(),
            months: months
                .iter()
                .map(|m| MonthLink {
                    name: month_name(m),
                    month: MonthKey::new(year, *m),
                })
                .collect(),
        }
    };

    ViewModel {
        title: format!("{} - {}", year, archive.site.title),
        page,
        nav,
    }
}

fn day_list(index: &ArchiveIndex, month: &MonthKey, articles: &[Article]) -> ViewModel {
    let days = days_in_month(articles);
    if days.is_empty() {
        return ViewModel::error(
            ErrorKind::NotFound,
            format!("No articles found or loaded for {}.", month),
        );
    }

    let sibling = |dir| sibling_month(index, &month.year, &month.month, dir);
    let nav = NavState {
        back: Some(NavLink::new(
            format!("« {}", month.year),
            NavigationTarget::year(month.year.as_str()),
        )),
        prev: sibling(Direction::Prev)
            .map(|m| NavLink::new(format!("‹ {}", m), NavigationTarget::month(&m))),
        next: sibling(Direction::Next)
            .map(|m| NavLink::new(format!("{} ›", m), NavigationTarget::month(&m))),
        unit: "Month",
    };

    ViewModel {
        title: format!("{} - Archive", month),
        page: Page::Days {
            month: month.clone(),
            days,
        },
        nav,
    }
}

fn day_articles(month: &MonthKey, day: &str, articles: &[Article], full: bool) -> ViewModel {
    let date = month.iso_date(day);
    let sorted = sorted_for_day(articles, &date);
    if sorted.is_empty() {
        return ViewModel::error(ErrorKind::NotFound, format!("No articles found for {}.", date));
    }

    let groups = group_by_page(&sorted)
        .into_iter()
        .map(|(page, members)| PageGroup {
            page,
            articles: members
                .iter()
                .map(|a| ArticleSummary::from_article(a, full))
                .collect(),
        })
        .collect();

    let day_target = |d: &str| {
        if full {
            NavigationTarget::full_day(month, d)
        } else {
            NavigationTarget::day(month, d)
        }
    };
    let suffix = if full { " Full" } else { "" };
    let nav = NavState {
        back: Some(if full {
            NavLink::new(
                format!("« Back to {} List", date),
                NavigationTarget::day(month, day),
            )
        } else {
            NavLink::new(format!("« {}", month), NavigationTarget::month(month))
        }),
        prev: sibling_day(articles, day, Direction::Prev)
            .map(|d| NavLink::new(format!("‹ Day {}{}", d, suffix), day_target(&d))),
        next: sibling_day(articles, day, Direction::Next)
            .map(|d| NavLink::new(format!("Day {}{} ›", d, suffix), day_target(&d))),
        unit: "Day",
    };

    if full {
        ViewModel {
            title: format!("{} Full View - Archive", date),
            page: Page::FullDay { date, groups },
            nav,
        }
    } else {
        ViewModel {
            title: format!("{} - Archive", date),
            page: Page::DayArticles {
                month: month.clone(),
                day: pad_day(day),
                date,
                groups,
            },
            nav,
        }
    }
}

fn article_view(month: &MonthKey, path: &str, hide_english: bool, articles: &[Article]) -> ViewModel {
    let Some(article) = find_by_path(articles, path) else {
        return ViewModel::error(ErrorKind::NotFound, format!("Article not found: {}", path));
    };
    let Some(day) = article.day() else {
        return ViewModel::error(
            ErrorKind::Invalid,
            format!("Article {} has an invalid date format.", path),
        );
    };

    let sorted = sorted_for_day(articles, &article.date);
    let (prev, next) = adjacent_in_day(&sorted, path);

    let content = format_content(&article.content).map(|mut content| {
        if hide_english && article.content.contains(DELIMITER) {
            content.english.clear();
        }
        content
    });
    let summary = ArticleSummary::from_article(article, false);

    ViewModel {
        title: format!("{} - {}", summary.title, article.date),
        page: Page::Article {
            date: article.date.clone(),
            content,
            hide_english,
            toggle: NavigationTarget::article(path, !hide_english),
            article: summary,
        },
        nav: NavState {
            back: Some(NavLink::new("« Back", NavigationTarget::day(month, day))),
            prev: prev.map(|a| {
                NavLink::new("‹ Prev Article", NavigationTarget::article(&a.path, hide_english))
            }),
            next: next.map(|a| {
                NavLink::new("Next Article ›", NavigationTarget::article(&a.path, hide_english))
            }),
            unit: "Article",
        },
    }
}
