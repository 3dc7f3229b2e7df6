//! Nested-selector lookups shared by the listing and detail extractors
//!
//! Every lookup walks a chain of CSS selectors, taking the first match at
//! each step. A step that matches nothing (or a selector that fails to
//! parse) ends the walk with no element; callers turn that into an empty
//! field rather than an error.

use scraper::{ElementRef, Selector};

/// Follows `chain` from `root`, returning the element the last step lands on
pub fn select_chain<'a>(root: ElementRef<'a>, chain: &[&str]) -> Option<ElementRef<'a>> {
    chain.iter().try_fold(root, |element, css| {
        let selector = Selector::parse(css).ok()?;
        element.select(&selector).next()
    })
}

/// Text of the element at the end of `chain`, whitespace-collapsed, or `""`
pub fn text_at(root: ElementRef<'_>, chain: &[&str]) -> String {
    select_chain(root, chain)
        .map(|element| collapse_whitespace(element.text()))
        .unwrap_or_default()
}

/// Trimmed attribute of the element at the end of `chain`, or `""`
pub fn attr_at(root: ElementRef<'_>, attr: &str, chain: &[&str]) -> String {
    select_chain(root, chain)
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Joins text fragments and collapses every whitespace run to one space
pub fn collapse_whitespace<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
