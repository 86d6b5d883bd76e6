//! Extraction of version history pages.
//!
//! A versions page lists one `li` per historical release inside a
//! `ul.ver-wrap` container. Each release's data rides on a download anchor;
//! rows without that anchor (the list's trailing "see more" row, promo rows)
//! are reported as per-row skips, never as listing failures.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::error::ExtractError;
use super::compile_static_selector;

static VERSION_LIST_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("ul.ver-wrap"));
static VERSION_ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("li"));
static VERSION_DOWNLOAD_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.ver_download_link"));

const VERSION_ATTR: &str = "data-dt-version";
const VERSION_CODE_ATTR: &str = "data-dt-versioncode";

/// One release row from a versions page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    /// Dotted version string the row declares.
    pub version: String,
    /// Download URL the row declares.
    pub download_link: String,
    /// Build number the row declares.
    pub version_code: String,
}

/// Per-row outcomes for a versions page, in page order.
///
/// Returns an empty list when the page has no version list container at all
/// (callers treat that the same as a list with no extractable rows).
#[must_use]
pub fn extract_release_outcomes(document: &Html) -> Vec<Result<ReleaseEntry, ExtractError>> {
    let Some(list) = document.select(&VERSION_LIST_SEL).next() else {
        return Vec::new();
    };
    list.select(&VERSION_ITEM_SEL)
        .map(extract_release_entry)
        .collect()
}

fn extract_release_entry(row: ElementRef<'_>) -> Result<ReleaseEntry, ExtractError> {
    let anchor = row
        .select(&VERSION_DOWNLOAD_SEL)
        .next()
        .ok_or_else(|| ExtractError::element_missing("version download link", "a.ver_download_link"))?;

    Ok(ReleaseEntry {
        version: required_attr(anchor, VERSION_ATTR)?,
        download_link: required_attr(anchor, "href")?,
        version_code: required_attr(anchor, VERSION_CODE_ATTR)?,
    })
}

fn required_attr(anchor: ElementRef<'_>, attr: &'static str) -> Result<String, ExtractError> {
    anchor
        .value()
        .attr(attr)
        .map(ToString::to_string)
        .ok_or_else(|| ExtractError::attribute_missing("version download link", attr))
}
