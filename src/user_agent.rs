//! Shared User-Agent strings for catalog and download HTTP clients.
//!
//! Single source for both browser profiles so standard-page traffic and
//! bypass traffic stay consistent and easy to update.

/// Default User-Agent for standard page requests.
///
/// The catalog serves its normal desktop markup only to plausible browser
/// agents; a tool-identifying agent gets the mobile or challenge variant.
pub(crate) const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// User-Agent for the bypass client engaged on HTTP 403.
///
/// A full Chrome profile; paired with a cookie store it passes the
/// challenge checks that block the default profile.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";
