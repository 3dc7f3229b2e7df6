//! Listing page extraction
//!
//! Turns one page of the ranked listing into [`ListingEntry`] fragments. Each
//! field is looked up independently; a missing field is an empty string.

use crate::crawler::parser::{attr_at, text_at};
use scraper::{Html, Selector};
use url::Url;

/// Class of the elements that wrap one listing entry
pub const ENTRY_SELECTOR: &str = "div.zg_itemImmersion";

const RANK: &[&str] = &["span.zg_rankNumber"];
const TITLE: &[&str] = &["div.zg_title", "a"];
const BYLINE: &[&str] = &["div.zg_byline"];
const REVIEW: &[&str] = &["div.zg_reviews", "span.a-icon-alt"];
const PRICE: &[&str] = &["div.zg_price", "strong.price"];
const IMAGE: &[&str] = &["div.zg_image", "img"];

/// Suffix given to normalized image references
const IMAGE_SUFFIX: &str = ".jpg";

/// One item as it appears on the listing page, before detail enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEntry {
    pub rank: String,
    pub title: String,
    pub byline: String,

    /// Detail page URL, resolved against the listing page (empty if absent)
    pub link: String,

    pub review: String,
    pub price: String,

    /// Full-size image reference, resolved and normalized
    pub image: String,
}

/// Extracts every listing entry from a page, in document order
///
/// # Arguments
///
/// * `html` - The listing page markup
/// * `page_url` - The URL the page was fetched from, for resolving links
pub fn extract_listing(html: &str, page_url: &Url) -> Vec<ListingEntry> {
    let Ok(entry_selector) = Selector::parse(ENTRY_SELECTOR) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);

    document
        .select(&entry_selector)
        .map(|entry| {
            let href = attr_at(entry, "href", TITLE);
            let src = attr_at(entry, "src", IMAGE);
            ListingEntry {
                rank: text_at(entry, RANK),
                title: text_at(entry, TITLE),
                byline: text_at(entry, BYLINE),
                link: resolve_link(&href, page_url),
                review: text_at(entry, REVIEW),
                price: text_at(entry, PRICE),
                image: normalize_image(&resolve_image(&src, page_url)),
            }
        })
        .collect()
}

/// Rewrites a thumbnail reference to its full-size asset name
///
/// Everything from the first `.` of the final path segment onwards is
/// replaced with `.jpg`, so `.../I/51abc._SL160_.png` becomes
/// `.../I/51abc.jpg`. References without such a dot are returned unchanged.
pub fn normalize_image(reference: &str) -> String {
    let segment_start = reference.rfind('/').map_or(0, |slash| slash + 1);

    match reference[segment_start..].find('.') {
        Some(dot) if segment_start + dot > 0 => {
            format!("{}{}", &reference[..segment_start + dot], IMAGE_SUFFIX)
        }
        _ => reference.to_string(),
    }
}

/// Resolves a reference against the listing page, keeping only HTTP(S) results
fn resolve_link(href: &str, page_url: &Url) -> String {
    if href.is_empty() {
        return String::new();
    }

    match page_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            absolute.to_string()
        }
        _ => String::new(),
    }
}

/// Resolves an image reference against the listing page
///
/// Unlike links, any scheme is kept: lazy-load placeholders arrive as
/// `data:` references and stay as they are. A reference that does not
/// resolve is passed through raw.
fn resolve_image(src: &str, page_url: &Url) -> String {
    if src.is_empty() {
        return String::new();
    }

    page_url
        .join(src)
        .map_or_else(|_| src.to_string(), |absolute| absolute.to_string())
}
