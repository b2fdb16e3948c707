//! HTML-to-record extraction.
//!
//! All parsers in this module are pure functions over already-fetched
//! markup. They never touch the network and never fail: absent sections
//! degrade to empty fields so one redesigned page element cannot poison a
//! whole batch run.

pub mod details;
pub mod docket;
pub mod record;
pub mod summary;

use scraper::ElementRef;

/// Visible text of an element with whitespace collapsed, the way a browser
/// would render it.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes an on-screen label into a record key: trailing colon dropped,
/// lowercased, spaces underscored. `"Date Filed:"` becomes `date_filed`.
pub(crate) fn snake_key(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}
