//! Detail page extraction
//!
//! A detail page supplies the item's identity token, taken from the labeled
//! lines of the product-details bullet list, and an optional synopsis taken
//! from the description block.

use crate::crawler::parser::{collapse_whitespace, text_at};
use scraper::{Html, Selector};

/// Label of the bullet line carrying the identity token
pub const IDENTITY_LABEL: &str = "ASIN";

/// Bullet-list lines that may carry the identity, tried in order
const DETAIL_LINES: &[&str] = &[
    "#detail_bullets_id li",
    "#detailBullets_feature_div li",
    "#productDetailsTable li",
];

const DESCRIPTION: &[&str] = &["div#bookDescription_feature_div", "noscript"];

/// Identity and synopsis of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailInfo {
    pub identity: String,
    pub synopsis: String,
}

/// Extracts the detail pair from a detail page
///
/// Returns `None` when no identity line is present; the synopsis is optional
/// and falls back to an empty string.
pub fn extract_detail(html: &str, synopsis_limit: usize) -> Option<DetailInfo> {
    let document = Html::parse_document(html);

    let identity = extract_identity(&document)?;
    let synopsis = truncate_synopsis(&extract_description(&document), synopsis_limit);

    Some(DetailInfo { identity, synopsis })
}

fn extract_identity(document: &Html) -> Option<String> {
    DETAIL_LINES
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .find_map(|line| identity_from_line(&collapse_whitespace(line.text())))
        })
}

/// Reads the identity token from a `Label: value` line
///
/// The label comparison is case-insensitive; direction marks that the source
/// sprinkles around the colon are ignored.
pub fn identity_from_line(line: &str) -> Option<String> {
    let (label, value) = line.split_once(':')?;

    if !trim_marks(label).eq_ignore_ascii_case(IDENTITY_LABEL) {
        return None;
    }

    let token = trim_marks(value);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn trim_marks(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || matches!(c, '\u{200e}' | '\u{200f}'))
}

/// Plain text of the description block
///
/// The block sits inside `<noscript>`, whose content the parser keeps as raw
/// markup, so the text is parsed a second time to strip tags and entities.
fn extract_description(document: &Html) -> String {
    let raw = text_at(document.root_element(), DESCRIPTION);
    if raw.is_empty() {
        return raw;
    }

    let fragment = Html::parse_fragment(&raw);
    collapse_whitespace(fragment.root_element().text())
}

/// Cuts a synopsis to `limit` characters, marking the cut with `...`
pub fn truncate_synopsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
