//! Extraction of app detail pages.
//!
//! Everything except rating and description is required here: a detail page
//! that lost its banner, date, SDK block, or download button yields no
//! partial result, only an error the catalog surfaces as a detail-parse
//! failure.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use super::error::ExtractError;
use super::{collapse_whitespace, compile_static_selector, element_text, select_first};
use crate::record::{NO_DESCRIPTION, NO_RATING};

static BANNER_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.detail_banner"));
static TITLE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.title_link"));
static RATING_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("span.rating"));
static DATE_SEL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("p.date"));
static SDK_INFO_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("p.details_sdk"));
static DOWNLOAD_BUTTON_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.download_apk_news"));
static DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.translate-content"));

const PACKAGE_NAME_ATTR: &str = "data-dt-package_name";
const VERSION_CODE_ATTR: &str = "data-dt-version_code";

/// Structural contract for the SDK info paragraph: the latest version lives
/// at this child content node index. Child nodes count text and element
/// nodes alike, matching the page's interleaved "Latest Version <span>...".
pub const SDK_INFO_VERSION_CHILD: usize = 1;

/// Structural contract for the SDK info paragraph: the developer name lives
/// at this child content node index.
pub const SDK_INFO_DEVELOPER_CHILD: usize = 3;

/// Fields pulled from one app detail page, before the version history is
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDetail {
    /// App title from the banner's title link.
    pub app_title: String,
    /// Store rating, or [`NO_RATING`].
    pub rating: String,
    /// Release date string.
    pub date: String,
    /// Latest version from the SDK block's positional layout.
    pub latest_version: String,
    /// Developer from the SDK block's positional layout.
    pub developer: String,
    /// Package identifier from the download button.
    pub package_name: String,
    /// Build number from the download button.
    pub package_version_code: String,
    /// Download URL from the download button.
    pub download_link: String,
    /// Long-form description, or [`NO_DESCRIPTION`].
    pub description: String,
}

/// Extracts the full detail-page field set.
///
/// # Errors
///
/// Returns [`ExtractError`] naming the first required element, attribute, or
/// positional child that is missing; no partial result is produced.
pub fn extract_app_detail(document: &Html) -> Result<AppDetail, ExtractError> {
    let banner = document
        .select(&BANNER_SEL)
        .next()
        .ok_or_else(|| ExtractError::element_missing("detail banner", "div.detail_banner"))?;

    let app_title = select_first(banner, &TITLE_LINK_SEL)
        .map(element_text)
        .ok_or_else(|| ExtractError::element_missing("title link", "div.title_link"))?;

    let rating =
        select_first(banner, &RATING_SEL).map_or_else(|| NO_RATING.to_string(), element_text);

    let date = select_first(banner, &DATE_SEL)
        .map(element_text)
        .ok_or_else(|| ExtractError::element_missing("release date", "p.date"))?;

    let sdk_info = select_first(banner, &SDK_INFO_SEL)
        .ok_or_else(|| ExtractError::element_missing("SDK info block", "p.details_sdk"))?;
    let latest_version = child_content_text(sdk_info, SDK_INFO_VERSION_CHILD)?;
    let developer = child_content_text(sdk_info, SDK_INFO_DEVELOPER_CHILD)?;

    let button = select_first(banner, &DOWNLOAD_BUTTON_SEL)
        .ok_or_else(|| ExtractError::element_missing("download button", "a.download_apk_news"))?;
    let package_name = required_attr(button, PACKAGE_NAME_ATTR)?;
    let package_version_code = required_attr(button, VERSION_CODE_ATTR)?;
    let download_link = required_attr(button, "href")?;

    // The description lives outside the banner.
    let description = document
        .select(&DESCRIPTION_SEL)
        .next()
        .map_or_else(|| NO_DESCRIPTION.to_string(), element_text);

    Ok(AppDetail {
        app_title,
        rating,
        date,
        latest_version,
        developer,
        package_name,
        package_version_code,
        download_link,
        description,
    })
}

/// Text of the child content node at `index`, whether it is a text node or
/// an element.
fn child_content_text(element: ElementRef<'_>, index: usize) -> Result<String, ExtractError> {
    let Some(child) = element.children().nth(index) else {
        let actual = element.children().count();
        return Err(ExtractError::sdk_info_layout(
            index,
            format!("only {actual} child node(s)"),
        ));
    };

    if let Some(child_element) = ElementRef::wrap(child) {
        return Ok(element_text(child_element));
    }
    if let Node::Text(text) = child.value() {
        return Ok(collapse_whitespace(text));
    }
    Err(ExtractError::sdk_info_layout(
        index,
        "node is neither text nor element",
    ))
}

fn required_attr(button: ElementRef<'_>, attr: &'static str) -> Result<String, ExtractError> {
    button
        .value()
        .attr(attr)
        .map(ToString::to_string)
        .ok_or_else(|| ExtractError::attribute_missing("download button", attr))
}
