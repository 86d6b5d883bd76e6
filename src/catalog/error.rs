//! Error types for catalog operations.
//!
//! Each variant names the operation input (query, title, version) that
//! failed, so CLI output can tell the user what to change.

use thiserror::Error;

use crate::download::DownloadError;
use crate::extract::ExtractError;
use crate::fetch::FetchError;

/// Errors that can occur in catalog client operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Search query was blank.
    #[error("search query is empty\n  Suggestion: Provide a non-blank app name to search for")]
    InvalidQuery,

    /// Operation called without the inputs it needs.
    #[error("invalid arguments: {reason}")]
    InvalidArgument {
        /// What was missing.
        reason: &'static str,
    },

    /// Search page had no primary result entry.
    #[error("no app found for '{query}'\n  Suggestion: Try a broader search query")]
    AppNotFound {
        /// The query that produced no primary entry.
        query: String,
    },

    /// No search result title matched exactly.
    #[error(
        "no result titled exactly '{title}'\n  Suggestion: Titles are case-sensitive; search first to see what the catalog calls the app"
    )]
    NoExactMatch {
        /// The title that matched nothing.
        title: String,
    },

    /// No search result matched the requested title or package name.
    #[error("no search result matches '{query}'")]
    NoMatch {
        /// The title or package name used for resolution.
        query: String,
    },

    /// The versions listing yielded no usable entries.
    #[error("no versions listed for '{app}'")]
    NoVersions {
        /// The app whose versions page was empty.
        app: String,
    },

    /// No listed version matched the requested version string.
    #[error(
        "version '{version}' of '{app}' not found\n  Suggestion: List the available versions first"
    )]
    VersionNotFound {
        /// The app being downloaded.
        app: String,
        /// The version string that matched nothing.
        version: String,
    },

    /// The first search entry could not be extracted.
    #[error("failed to extract the first search entry from {url}: {source}")]
    Extract {
        /// The search page URL.
        url: String,
        /// What was missing from the entry.
        #[source]
        source: ExtractError,
    },

    /// The app detail page is missing required structure.
    #[error("failed to parse app detail page {url}: {source}")]
    DetailParse {
        /// The detail page URL.
        url: String,
        /// The element or attribute that was missing.
        #[source]
        source: ExtractError,
    },

    /// Page fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// File download failed.
    #[error("download failed for '{app}': {source}")]
    Download {
        /// The app being downloaded.
        app: String,
        /// The underlying download failure.
        #[source]
        source: DownloadError,
    },
}

impl CatalogError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(reason: &'static str) -> Self {
        Self::InvalidArgument { reason }
    }

    /// Creates an app-not-found error.
    #[must_use]
    pub fn app_not_found(query: impl Into<String>) -> Self {
        Self::AppNotFound {
            query: query.into(),
        }
    }

    /// Creates a no-exact-match error.
    #[must_use]
    pub fn no_exact_match(title: impl Into<String>) -> Self {
        Self::NoExactMatch {
            title: title.into(),
        }
    }

    /// Creates a no-match error for target resolution.
    #[must_use]
    pub fn no_match(query: impl Into<String>) -> Self {
        Self::NoMatch {
            query: query.into(),
        }
    }

    /// Creates a no-versions error.
    #[must_use]
    pub fn no_versions(app: impl Into<String>) -> Self {
        Self::NoVersions { app: app.into() }
    }

    /// Creates a version-not-found error.
    #[must_use]
    pub fn version_not_found(app: impl Into<String>, version: impl Into<String>) -> Self {
        Self::VersionNotFound {
            app: app.into(),
            version: version.into(),
        }
    }

    /// Creates an extraction error for a search page.
    #[must_use]
    pub fn extract(url: impl Into<String>, source: ExtractError) -> Self {
        Self::Extract {
            url: url.into(),
            source,
        }
    }

    /// Creates a detail-page parse error.
    #[must_use]
    pub fn detail_parse(url: impl Into<String>, source: ExtractError) -> Self {
        Self::DetailParse {
            url: url.into(),
            source,
        }
    }

    /// Creates a download error wrapped with app context.
    #[must_use]
    pub fn download(app: impl Into<String>, source: DownloadError) -> Self {
        Self::Download {
            app: app.into(),
            source,
        }
    }
}
