//! Bilingual article body formatting.
//!
//! Article bodies hold an English translation, the literal delimiter
//! `<hr />`, then the original Chinese text (sometimes labelled
//! `Original:`). Formatting produces paragraph blocks; turning them into
//! HTML is the renderer's job.

/// Separator between the English and Chinese halves.
pub const DELIMITER: &str = "<hr />";

const ORIGINAL_LABEL: &str = "original:";

/// A formatted paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paragraph {
    /// A `###` line, marker stripped.
    Heading(String),
    /// A regular line with smart quotes applied.
    Text(String),
}

/// Both halves of an article, already split into paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedContent {
    pub english: Vec<Paragraph>,
    pub chinese: Vec<Paragraph>,
}

impl FormattedContent {
    pub fn is_empty(&self) -> bool {
        self.english.is_empty() && self.chinese.is_empty()
    }
}

/// Replace straight quotes with typographic ones.
///
/// A quote opens at the start of the text or after whitespace, `-`, `(`,
/// `[` or a straight quote that did not itself open; every other double
/// quote closes. Remaining single quotes (apostrophes and closers) become
/// `’`.
pub fn smarten_quotes(text: &str) -> String {
    let doubles = replace_quote(text, '"', '\u{201c}', '\u{201d}', &['-', '(', '[', '"']);
    replace_quote(&doubles, '\'', '\u{2018}', '\u{2019}', &['-', '(', '[', '\'', '"'])
}

fn replace_quote(text: &str, quote: char, open: char, close: char, openers: &[char]) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    // An opener claims the character before it, so it cannot in turn
    // open the quote that follows.
    let mut prev_opened = false;
    for c in text.chars() {
        let mut opened = false;
        if c == quote {
            opened = !prev_opened
                && match prev {
                    None => true,
                    Some(p) => p.is_whitespace() || openers.contains(&p),
                };
            out.push(if opened { open } else { close });
        } else {
            out.push(c);
        }
        prev = Some(c);
        prev_opened = opened;
    }
    out
}

/// Split `content` into its trimmed English half and its Chinese half with a
/// leading `Original:` label removed. Text after a second delimiter is
/// ignored.
pub fn split_bilingual(content: &str) -> (&str, &str) {
    let mut parts = content.split(DELIMITER);
    let english = parts.next().unwrap_or_default().trim();
    let chinese = parts.next().unwrap_or_default().trim();
    (english, strip_original_label(chinese))
}

fn strip_original_label(text: &str) -> &str {
    match text.get(..ORIGINAL_LABEL.len()) {
        Some(head) if head.eq_ignore_ascii_case(ORIGINAL_LABEL) => {
            text[ORIGINAL_LABEL.len()..].trim()
        }
        _ => text,
    }
}

/// Split a block of text into non-empty trimmed lines.
pub fn paragraphs(text: &str) -> Vec<Paragraph> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix("###") {
            Some(heading) => Paragraph::Heading(heading.trim().to_string()),
            None => Paragraph::Text(smarten_quotes(line)),
        })
        .collect()
}

/// Format a full article body. `None` when there is no content at all.
pub fn format_content(content: &str) -> Option<FormattedContent> {
    if content.is_empty() {
        return None;
    }
    let (english, chinese) = split_bilingual(content);
    Some(FormattedContent {
        english: paragraphs(english),
        chinese: paragraphs(chinese),
    })
}
