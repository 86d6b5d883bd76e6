//! CSS-selector extraction from catalog pages.
//!
//! Three page shapes are understood:
//!
//! - [`listing`] - search result pages: one optional "first/best match"
//!   entry plus a ranked list, each entry yielding a per-entry outcome so a
//!   malformed entry skips instead of aborting the listing
//! - [`versions`] - an app's version history page, one release row per list
//!   item
//! - [`detail`] - a full app detail page, where every element except rating
//!   and description is required
//!
//! Optional fields fall back through an ordered selector chain to
//! `"Unknown"` or a documented sentinel; fields required for identity fail
//! the entry with [`ExtractError`].

mod detail;
mod error;
mod listing;
mod versions;

pub use detail::{AppDetail, SDK_INFO_DEVELOPER_CHILD, SDK_INFO_VERSION_CHILD, extract_app_detail};
pub use error::ExtractError;
pub use listing::{extract_first_entry, extract_listing_outcomes, extract_search_entry};
pub use versions::{ReleaseEntry, extract_release_outcomes};

use scraper::{ElementRef, Selector};

/// Fallback value for optional fields with no matching element.
pub(crate) const UNKNOWN: &str = "Unknown";

/// Compiles a selector literal known to be valid.
///
/// # Panics
///
/// Panics on an invalid pattern; only reachable from static initializers.
pub(crate) fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e}"))
}

/// First element under `scope` matching `selector`.
pub(crate) fn select_first<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Whitespace-normalized text content of an element and its descendants.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_element_text_collapses_nested_whitespace() {
        let html = Html::parse_fragment("<p>  Telegram\n   <span>Messenger</span>  </p>");
        let p = html
            .select(&compile_static_selector("p"))
            .next()
            .unwrap();
        assert_eq!(element_text(p), "Telegram Messenger");
    }

    #[test]
    fn test_select_first_returns_document_order_match() {
        let html = Html::parse_fragment("<div><a class='x'>one</a><a class='x'>two</a></div>");
        let div = html
            .select(&compile_static_selector("div"))
            .next()
            .unwrap();
        let first = select_first(div, &compile_static_selector("a.x")).unwrap();
        assert_eq!(element_text(first), "one");
    }

    #[test]
    fn test_collapse_whitespace_empty_input() {
        assert_eq!(collapse_whitespace("   \n\t "), "");
    }
}
