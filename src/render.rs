//! HTML rendering of archive browser views.
//!
//! Every page shares one document shell: the archive title, the view's
//! navigation bar, the view body and a footer built from [`SiteInfo`].
//! Navigation links carry `data-nav="back|prev|next"` so the inline script
//! can bind them to the arrow and escape keys.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use news_archive_core::calendar::{MonthGrid, WEEKDAYS};
use news_archive_core::content::{FormattedContent, Paragraph};
use news_archive_core::nav::NavigationTarget;

use crate::archives::{Archive, SiteInfo};
use crate::browse::{ArticleSummary, NavLink, NavState, Page, PageGroup, ViewModel};

const CSS: &str = r#"
body { font-family: Georgia, serif; max-width: 52rem; margin: 0 auto; padding: 1rem; line-height: 1.5; }
a { color: #8b0000; }
nav.view-nav { display: flex; justify-content: space-between; margin: 1rem 0; }
nav.view-nav .disabled { color: #999; }
.year-grid, .day-list { list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: .5rem; }
.year-box { display: inline-block; border: 1px solid #ccc; padding: .5rem 1rem; text-decoration: none; }
.year-box .location { display: block; font-size: .75rem; color: #666; }
.month-block { margin-bottom: 1.5rem; }
.calendar-grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 2px; }
.calendar-grid .weekday { font-weight: bold; text-align: center; }
.day-box { text-align: center; padding: .25rem; border: 1px solid #eee; }
.day-box.empty { color: #bbb; }
.meta { color: #555; font-size: .9rem; }
.content .zh { border-top: 1px solid #ccc; margin-top: 1rem; padding-top: 1rem; }
.lang-toggle { border: 1px solid #8b0000; padding: 0 .4rem; text-decoration: none; }
.lang-toggle[aria-pressed="false"] { opacity: .5; }
.error { color: #8b0000; }
footer { margin-top: 2rem; font-size: .85rem; color: #666; }
"#;

const KEYS_JS: &str = r#"
document.addEventListener('keydown', function (e) {
  if (e.altKey || e.ctrlKey || e.metaKey || e.shiftKey) return;
  var nav = { ArrowLeft: 'prev', ArrowRight: 'next', Escape: 'back' }[e.key];
  if (!nav) return;
  var link = document.querySelector('a[data-nav="' + nav + '"]');
  if (link) window.location.href = link.href;
});
"#;

/// URL path of an archive's browser page.
pub fn archive_base(name: &str) -> String {
    format!("/archive/{}", name)
}

fn document(title: &str, heading: Markup, body: Markup, footer: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                header { (heading) }
                main { (body) }
                (footer)
                script { (PreEscaped(KEYS_JS)) }
            }
        }
    }
}

fn footer(base: &str, site: &SiteInfo) -> Markup {
    html! {
        footer {
            p {
                a href=(base) { "Archive Home" }
                @if let Some(link) = &site.source_link {
                    " · "
                    a href=(link) target="_blank" rel="noopener" { "Project Home" }
                }
            }
            @if let Some(name) = &site.source_name {
                p {
                    "Source of texts: "
                    @match &site.source_link {
                        Some(link) => a href=(link) target="_blank" rel="noopener" { (name) },
                        None => (name),
                    }
                }
            }
            @if let Some(updated) = &site.last_updated {
                p { "Last updated: " (updated) }
            }
        }
    }
}

fn nav_link(base: &str, role: &str, link: &NavLink) -> Markup {
    html! {
        a href=(link.target.href(base)) data-nav=(role) { (link.label) }
    }
}

fn nav_bar(base: &str, nav: &NavState) -> Markup {
    if nav.back.is_none() && nav.prev.is_none() && nav.next.is_none() {
        return html! {};
    }
    html! {
        nav.view-nav {
            span.back {
                @if let Some(back) = &nav.back {
                    (nav_link(base, "back", back))
                }
            }
            span.siblings {
                @match &nav.prev {
                    Some(prev) => (nav_link(base, "prev", prev)),
                    None => span.disabled { "‹ Prev " (nav.unit) },
                }
                " | "
                @match &nav.next {
                    Some(next) => (nav_link(base, "next", next)),
                    None => span.disabled { "Next " (nav.unit) " ›" },
                }
            }
        }
    }
}

fn paragraphs(items: &[Paragraph]) -> Markup {
    html! {
        @for item in items {
            @match item {
                Paragraph::Heading(text) => p { strong { (text) } },
                Paragraph::Text(text) => p { (text) },
            }
        }
    }
}

fn formatted(content: Option<&FormattedContent>) -> Markup {
    html! {
        div.content {
            @match content.filter(|c| !c.is_empty()) {
                Some(content) => {
                    @if !content.english.is_empty() {
                        div.en { (paragraphs(&content.english)) }
                    }
                    @if !content.chinese.is_empty() {
                        div.zh lang="zh" { (paragraphs(&content.chinese)) }
                    }
                }
                None => p { "No content available." },
            }
        }
    }
}

fn article_meta(article: &ArticleSummary, date: Option<&str>) -> Markup {
    html! {
        p.meta {
            @if let Some(author) = &article.author {
                span.author { "Author: " (author) }
                " "
            }
            @if let Some(date) = date {
                span.date { "Date: " (date) }
                " "
            }
            @if let Some(page) = &article.page_number {
                span.page { "Page: " (page) }
            }
        }
    }
}

fn calendar(month: &MonthGrid, link_base: &str) -> Markup {
    html! {
        section.month-block {
            h3 { (month.name) }
            div.calendar-grid {
                @for weekday in WEEKDAYS {
                    div.weekday { (weekday) }
                }
                @for _ in 0..month.leading_blanks {
                    div.day-box.blank {}
                }
                @for day in &month.days {
                    @match &day.link {
                        Some(path) => a.day-box href={ (link_base) (path) } { (day.day) },
                        None => div.day-box.empty { (day.day) },
                    }
                }
            }
        }
    }
}

fn page_groups(base: &str, groups: &[PageGroup]) -> Markup {
    html! {
        @for group in groups {
            section.page-group {
                h3 { (group.heading()) }
                ul {
                    @for article in &group.articles {
                        li {
                            a href=(NavigationTarget::article(article.path.as_str(), false).href(base)) {
                                (article.title)
                            }
                            @if let Some(author) = &article.author {
                                " "
                                span.author { "by " (author) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn full_groups(groups: &[PageGroup]) -> Markup {
    html! {
        @for group in groups {
            section.page-group {
                h3 { (group.heading()) }
                @for article in &group.articles {
                    article {
                        h4 { (article.title) }
                        (article_meta(article, None))
                        (formatted(article.content.as_ref().and_then(Option::as_ref)))
                    }
                }
            }
        }
    }
}

fn body(base: &str, page: &Page) -> Markup {
    match page {
        Page::Years {
            years,
            introduction,
        } => html! {
            @if let Some(intro) = introduction {
                div.introduction { (PreEscaped(intro)) }
            }
            ul.year-grid {
                @for year in years {
                    li {
                        a.year-box href=(NavigationTarget::year(year.label.as_str()).href(base)) {
                            span.year { (year.year) }
                            @if let Some(location) = &year.location {
                                span.location { (location) }
                            }
                        }
                    }
                }
            }
        },
        Page::Months { year, months } => html! {
            h2 { (year) }
            ul.month-list {
                @for month in months {
                    li {
                        a href=(NavigationTarget::month(&month.month).href(base)) { (month.name) }
                    }
                }
            }
        },
        Page::Calendar {
            year,
            months,
            link_base,
        } => html! {
            h2 { (year) }
            @for month in months {
                (calendar(month, link_base))
            }
        },
        Page::Days { month, days } => html! {
            h2 { (month.to_string()) }
            ul.day-list {
                @for day in days {
                    li {
                        a href=(NavigationTarget::day(month, day.as_str()).href(base)) { "Day " (day) }
                        " "
                        a.full href=(NavigationTarget::full_day(month, day.as_str()).href(base)) {
                            "Full View"
                        }
                    }
                }
            }
        },
        Page::DayArticles {
            month,
            day,
            date,
            groups,
        } => html! {
            h2 { (date) }
            p {
                a href=(NavigationTarget::full_day(month, day.as_str()).href(base)) { "Full Day View" }
            }
            (page_groups(base, groups))
        },
        Page::FullDay { date, groups } => html! {
            h2 { (date) " - Full View" }
            (full_groups(groups))
        },
        Page::Article {
            article,
            date,
            content,
            hide_english,
            toggle,
        } => html! {
            article {
                h2 { (article.title) }
                (article_meta(article, Some(date)))
                p {
                    a.lang-toggle href=(toggle.href(base)) role="button"
                        aria-pressed=(if *hide_english { "false" } else { "true" })
                        title="Show or hide the English translation" { "E" }
                }
                (formatted(content.as_ref()))
            }
        },
        Page::Error { message, .. } => error_body(base, message),
    }
}

fn error_body(base: &str, message: &str) -> Markup {
    html! {
        p.error { (message) }
        p { a href=(base) { "Return to Archive Home" } }
    }
}

/// Render a resolved view of `archive` as a complete HTML document.
pub fn render_view(archive: &Archive, view: &ViewModel) -> Markup {
    let base = archive_base(&archive.name);
    let heading = html! {
        h1 { a href=(base) { (archive.site.title) } }
    };
    let content = html! {
        (nav_bar(&base, &view.nav))
        (body(&base, &view.page))
    };
    document(&view.title, heading, content, footer(&base, &archive.site))
}

/// Page for an archive name that is not configured.
pub fn render_unknown_archive(name: &str) -> Markup {
    let heading = html! { h1 { "Archive not found" } };
    let content = html! {
        p.error { "No archive named " (name) " is configured." }
    };
    document("Archive not found", heading, content, html! {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{ErrorKind, YearLink};
    use news_archive_core::index::{ArchiveIndex, MonthKey};
    use news_archive_core::months::MonthSource;
    use news_archive_core::models::Article;
    use std::sync::Arc;

    struct NoMonths;

    #[async_trait::async_trait]
    impl MonthSource for NoMonths {
        fn locate(&self, month: &MonthKey) -> String {
            month.to_string()
        }
        async fn load(&self, _: &MonthKey) -> anyhow::Result<Vec<Article>> {
            Ok(Vec::new())
        }
    }

    fn archive() -> Archive {
        let site = SiteInfo {
            title: "Test Daily".to_string(),
            source_name: Some("fangj/rmrb".to_string()),
            source_link: Some("https://github.com/fangj/rmrb".to_string()),
            last_updated: Some("April 8, 2025".to_string()),
            introduction: Some("<p>Hello <em>reader</em></p>".to_string()),
        };
        Archive::with_index("rmrb", site, ArchiveIndex::default(), Arc::new(NoMonths))
    }

    #[test]
    fn test_year_list_document() {
        let vm = ViewModel {
            title: "Test Daily".to_string(),
            page: Page::Years {
                years: vec![YearLink {
                    label: "1939 SH".to_string(),
                    year: "1939".to_string(),
                    location: Some("SH".to_string()),
                }],
                introduction: Some("<p>Hello <em>reader</em></p>".to_string()),
            },
            nav: NavState::default(),
        };
        let html = render_view(&archive(), &vm).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<em>reader</em>"));
        assert!(html.contains("href=\"/archive/rmrb?year=1939+SH\""));
        assert!(html.contains("<span class=\"location\">SH</span>"));
        assert!(html.contains("Source of texts: "));
        assert!(html.contains("Last updated: April 8, 2025"));
        assert!(!html.contains("view-nav"));
    }

    #[test]
    fn test_nav_bar_links_and_disabled_controls() {
        let nav = NavState {
            back: Some(NavLink {
                label: "« All Years".to_string(),
                target: NavigationTarget::home(),
            }),
            prev: None,
            next: Some(NavLink {
                label: "1967 ›".to_string(),
                target: NavigationTarget::year("1967"),
            }),
            unit: "Year",
        };
        let html = nav_bar("/archive/rmrb", &nav).into_string();
        assert!(html.contains("<a href=\"/archive/rmrb\" data-nav=\"back\">« All Years</a>"));
        assert!(html.contains("<span class=\"disabled\">‹ Prev Year</span>"));
        assert!(html.contains("data-nav=\"next\""));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let vm = ViewModel {
            title: "Archive".to_string(),
            page: Page::Error {
                kind: ErrorKind::NotFound,
                message: "Article not found: <script>".to_string(),
            },
            nav: NavState::default(),
        };
        let html = render_view(&archive(), &vm).into_string();
        assert!(html.contains("Article not found: &lt;script&gt;"));
        assert!(html.contains("Return to Archive Home"));
    }

    #[test]
    fn test_formatted_content_halves() {
        let content = news_archive_core::content::format_content("### Head\nBody<hr />原文");
        let html = formatted(content.as_ref()).into_string();
        assert!(html.contains("<strong>Head</strong>"));
        assert!(html.contains("<p>原文</p>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(formatted(None).into_string().contains("No content available."));
    }

    #[test]
    fn test_unknown_archive_page() {
        let html = render_unknown_archive("nope").into_string();
        assert!(html.contains("No archive named nope is configured."));
    }
}
