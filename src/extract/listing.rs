//! Extraction of search listing entries.
//!
//! A search page carries one optional "first/best match" container plus a
//! ranked result list. Both entry shapes go through [`extract_search_entry`];
//! the listing-level functions report one outcome per entry so callers can
//! skip malformed entries without losing the rest.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::error::ExtractError;
use super::{UNKNOWN, compile_static_selector, element_text, select_first};
use crate::record::{FieldMap, SearchResult};

static FIRST_ENTRY_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.first"));
static RANKED_LIST_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("ul#search-res"));
static LIST_ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("li"));

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("p.p1"));
static DEVELOPER_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("p.p2"));
static PACKAGE_URL_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.first-info"));
static PACKAGE_URL_FALLBACK_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.dd"));
static ICON_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("img"));
static DOWNLOAD_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.is-download"));
static DOWNLOAD_FALLBACK_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.da"));

/// Data attributes carrying package metadata, either on the download button
/// or (older layout) directly on the entry container.
const PACKAGE_NAME_ATTR: &str = "data-dt-app";
const PACKAGE_SIZE_ATTR: &str = "data-dt-filesize";
const PACKAGE_VERSION_ATTR: &str = "data-dt-version";
const PACKAGE_VERSION_CODE_ATTR: &str = "data-dt-versioncode";

/// Per-entry outcomes for one search page: the first/best entry when the
/// page has one, followed by every ranked list entry in page order.
#[must_use]
pub fn extract_listing_outcomes(document: &Html) -> Vec<Result<SearchResult, ExtractError>> {
    let mut outcomes = Vec::new();
    if let Some(first) = extract_first_entry(document) {
        outcomes.push(first);
    }
    if let Some(list) = document.select(&RANKED_LIST_SEL).next() {
        for item in list.select(&LIST_ITEM_SEL) {
            outcomes.push(extract_search_entry(item));
        }
    }
    outcomes
}

/// Outcome for the page's "first/best match" container, or `None` when the
/// page has no such container at all.
#[must_use]
pub fn extract_first_entry(document: &Html) -> Option<Result<SearchResult, ExtractError>> {
    document
        .select(&FIRST_ENTRY_SEL)
        .next()
        .map(extract_search_entry)
}

/// Extracts one listing entry (first/best container or ranked list item)
/// into a record.
///
/// Optional fields degrade to `"Unknown"`; the package URL and download link
/// are required for identity and fail the entry when both their selectors
/// come up empty.
///
/// # Errors
///
/// Returns [`ExtractError::FieldMissing`] when a required selector chain is
/// exhausted.
pub fn extract_search_entry(entry: ElementRef<'_>) -> Result<SearchResult, ExtractError> {
    let mut fields = FieldMap::new();
    fields.insert("app_title".to_string(), text_or_unknown(entry, &TITLE_SEL));
    fields.insert(
        "developer".to_string(),
        text_or_unknown(entry, &DEVELOPER_SEL),
    );
    fields.insert("icon".to_string(), icon(entry));
    fields.insert("package_url".to_string(), package_url(entry)?);
    fields.insert("download_link".to_string(), download_link(entry)?);
    for (key, value) in package_metadata(entry) {
        fields.insert(key.to_string(), value);
    }
    Ok(SearchResult::from_fields(&fields)?)
}

fn text_or_unknown(entry: ElementRef<'_>, selector: &Selector) -> String {
    select_first(entry, selector).map_or_else(|| UNKNOWN.to_string(), element_text)
}

fn icon(entry: ElementRef<'_>) -> String {
    select_first(entry, &ICON_SEL)
        .and_then(|img| img.value().attr("src"))
        .map_or_else(|| UNKNOWN.to_string(), ToString::to_string)
}

fn package_url(entry: ElementRef<'_>) -> Result<String, ExtractError> {
    let anchor = select_first(entry, &PACKAGE_URL_SEL)
        .or_else(|| select_first(entry, &PACKAGE_URL_FALLBACK_SEL))
        .ok_or_else(|| ExtractError::field_missing("package_url", "a.first-info", "a.dd"))?;
    Ok(href_or_unknown(anchor))
}

fn download_link(entry: ElementRef<'_>) -> Result<String, ExtractError> {
    let anchor = select_first(entry, &DOWNLOAD_SEL)
        .or_else(|| select_first(entry, &DOWNLOAD_FALLBACK_SEL))
        .ok_or_else(|| ExtractError::field_missing("download_link", "a.is-download", "a.da"))?;
    Ok(href_or_unknown(anchor))
}

fn href_or_unknown(anchor: ElementRef<'_>) -> String {
    anchor
        .value()
        .attr("href")
        .map_or_else(|| UNKNOWN.to_string(), ToString::to_string)
}

/// Package name/size/version/version-code from the download button's data
/// attributes, or from the entry container when the button does not carry
/// the identity attribute (two page layouts place these differently).
fn package_metadata(entry: ElementRef<'_>) -> Vec<(&'static str, String)> {
    let source = select_first(entry, &DOWNLOAD_SEL)
        .filter(|button| button.value().attr(PACKAGE_NAME_ATTR).is_some())
        .unwrap_or(entry);

    [
        ("package_name", PACKAGE_NAME_ATTR),
        ("package_size", PACKAGE_SIZE_ATTR),
        ("package_version", PACKAGE_VERSION_ATTR),
        ("package_version_code", PACKAGE_VERSION_CODE_ATTR),
    ]
    .into_iter()
    .filter_map(|(field, attr)| {
        source
            .value()
            .attr(attr)
            .map(|value| (field, value.to_string()))
    })
    .collect()
}
