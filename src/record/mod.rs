//! Value records produced by the extraction pipeline.
//!
//! Two shapes: [`SearchResult`] (one listing or version entry, flat fields,
//! orderable by parsed version) and [`AppInfo`] (full detail-page metadata
//! plus the version history). Both are immutable once built; the only
//! sanctioned mutation is [`SearchResult::with_release`], which copies a
//! record and overlays one release's data onto it.

mod error;

pub use error::RecordError;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// String-keyed field set emitted by the extractor for one listing entry.
///
/// Keys must come from [`SEARCH_RESULT_FIELDS`]; construction rejects
/// anything else.
pub type FieldMap = BTreeMap<String, String>;

/// Closed field contract for search records.
///
/// [`SearchResult::from_fields`] validates every input key against this
/// table, so a markup change that surfaces a new attribute fails loudly
/// here instead of silently growing the record.
pub const SEARCH_RESULT_FIELDS: [&str; 9] = [
    "app_title",
    "developer",
    "icon",
    "package_name",
    "package_size",
    "package_version",
    "package_version_code",
    "download_link",
    "package_url",
];

/// Sentinel stored when the detail page carries no rating element.
pub const NO_RATING: &str = "no rating available";

/// Sentinel stored when the detail page carries no description block.
pub const NO_DESCRIPTION: &str = "no description available";

/// One search hit or version entry from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Human-readable app title.
    pub app_title: String,
    /// Developer/publisher name.
    pub developer: String,
    /// Icon image URL.
    pub icon: String,
    /// The app's unique identifier on the store (e.g. `org.telegram.messenger`).
    pub package_name: String,
    /// Store-reported package size (kept verbatim, often with a unit).
    pub package_size: String,
    /// Dotted numeric version string, e.g. `"1.2.10"`. May be empty.
    pub package_version: String,
    /// Monotonic build number, kept as the integer-like string the page declares.
    pub package_version_code: String,
    /// Direct or page-level download URL. May be empty pending resolution.
    pub download_link: String,
    /// The app's detail page URL.
    pub package_url: String,
}

impl SearchResult {
    /// Builds a record from the extractor's field map.
    ///
    /// Keys outside [`SEARCH_RESULT_FIELDS`] fail with
    /// [`RecordError::UnknownField`]; absent keys default to the empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownField`] naming the first key that is
    /// not part of the record contract.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, RecordError> {
        for key in fields.keys() {
            if !SEARCH_RESULT_FIELDS.contains(&key.as_str()) {
                return Err(RecordError::unknown_field(key));
            }
        }
        let get = |name: &str| fields.get(name).cloned().unwrap_or_default();
        Ok(Self {
            app_title: get("app_title"),
            developer: get("developer"),
            icon: get("icon"),
            package_name: get("package_name"),
            package_size: get("package_size"),
            package_version: get("package_version"),
            package_version_code: get("package_version_code"),
            download_link: get("download_link"),
            package_url: get("package_url"),
        })
    }

    /// Copy of this record with one release's data overlaid.
    ///
    /// Used when synthesizing per-version entries from a versions page: the
    /// base record supplies the app identity, the page entry supplies the
    /// release fields.
    #[must_use]
    pub fn with_release(&self, version: &str, download_link: &str, version_code: &str) -> Self {
        Self {
            package_version: version.to_string(),
            download_link: download_link.to_string(),
            package_version_code: version_code.to_string(),
            ..self.clone()
        }
    }

    /// Parses `package_version` into its numeric tuple.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidVersion`] on the first non-integer
    /// segment. An empty version string is invalid too (its single segment
    /// is empty).
    pub fn version_tuple(&self) -> Result<Vec<u64>, RecordError> {
        parse_version_tuple(&self.package_version)
    }

    /// Compares two records by parsed version tuple.
    ///
    /// Equal tuples compare equal regardless of every other field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidVersion`] if either side's version has
    /// a non-integer segment.
    pub fn compare_versions(&self, other: &Self) -> Result<Ordering, RecordError> {
        Ok(self.version_tuple()?.cmp(&other.version_tuple()?))
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} by {} ({})",
            self.app_title, self.package_version, self.developer, self.package_name
        )
    }
}

/// Parses a dotted version string into its integer segments.
pub(crate) fn parse_version_tuple(version: &str) -> Result<Vec<u64>, RecordError> {
    version
        .split('.')
        .map(|segment| {
            segment
                .parse::<u64>()
                .map_err(|_| RecordError::invalid_version(version, segment))
        })
        .collect()
}

/// Full app metadata from one detail page, plus the version history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    /// Human-readable app title.
    pub app_title: String,
    /// Store rating, or [`NO_RATING`].
    pub rating: String,
    /// Release date string as the page shows it.
    pub date: String,
    /// Latest version string (may be a phrase like "Varies with device").
    pub latest_version: String,
    /// Long-form description, or [`NO_DESCRIPTION`].
    pub description: String,
    /// Developer/publisher name.
    pub developer: String,
    /// The app's unique identifier on the store.
    pub package_name: String,
    /// Build number of the latest release.
    pub package_version_code: String,
    /// Download URL for the latest release.
    pub download_link: String,
    /// Historical releases in page order, each carrying the base identity
    /// fields plus that release's version data.
    pub older_versions: Vec<SearchResult>,
}

impl fmt::Display for AppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.app_title, self.package_name)?;
        writeln!(f, "  developer:      {}", self.developer)?;
        writeln!(f, "  rating:         {}", self.rating)?;
        writeln!(f, "  released:       {}", self.date)?;
        writeln!(f, "  latest version: {}", self.latest_version)?;
        write!(f, "  known versions: {}", self.older_versions.len())
    }
}
