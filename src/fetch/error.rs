//! Error types for the fetch module.
//!
//! Every variant carries the URL that was being fetched so callers can
//! report which catalog page failed without threading extra context.

use thiserror::Error;

/// Errors that can occur while fetching a catalog page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Transport {
        /// The URL that failed to load.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The catalog answered 403 for the default profile and the
    /// browser-profile retry did not get through either.
    #[error(
        "[BLOCKED] access denied for {url}: HTTP 403, browser-profile retry got HTTP {bypass_status}\n  Suggestion: The catalog is refusing automated traffic; wait a few minutes before retrying."
    )]
    Blocked {
        /// The URL the catalog refused.
        url: String,
        /// Status code returned to the browser-profile client.
        bypass_status: u16,
    },

    /// Every fetch attempt returned a protection interstitial instead of content.
    #[error(
        "protection page persisted for {url} after {attempts} attempts\n  Suggestion: The site is inside a verification window; retry later or raise the attempt budget."
    )]
    InterstitialExhausted {
        /// The URL that kept serving the interstitial.
        url: String,
        /// Total number of fetch attempts made.
        attempts: u32,
    },
}

impl FetchError {
    /// Creates a transport error from a reqwest error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a blocked error recording what the bypass client got back.
    pub fn blocked(url: impl Into<String>, bypass_status: u16) -> Self {
        Self::Blocked {
            url: url.into(),
            bypass_status,
        }
    }

    /// Creates an interstitial exhaustion error.
    pub fn interstitial_exhausted(url: impl Into<String>, attempts: u32) -> Self {
        Self::InterstitialExhausted {
            url: url.into(),
            attempts,
        }
    }
}

// No `From<reqwest::Error>` on purpose: every variant needs the URL being
// fetched, which the source error alone cannot provide. Callers go through
// the constructor methods so that context is never lost.
