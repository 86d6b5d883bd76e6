//! Catalog client: typed operations over the store's public pages.
//!
//! # Architecture
//!
//! - [`ApkPure`] owns one [`PageFetcher`], the store and download-host base
//!   URLs (injectable for tests), and an [`ApkDownloader`] for package
//!   payloads.
//! - Search operations fetch `<base>/search?q=..` and hand the page to the
//!   extraction layer. Malformed entries are logged and skipped; a record is
//!   either complete or absent, never partial.
//! - Version history resolves an app via search, fetches
//!   `<package_url>/versions`, and synthesizes one record per release by
//!   overlaying the release row onto the resolved record.
//! - [`ApkPure::download`] resolves a target record (caller-supplied record,
//!   requested version, or latest release), builds the direct-download URL,
//!   and delegates the transfer to the downloader.

mod error;

pub use error::CatalogError;

use std::path::PathBuf;

use reqwest::header::HeaderMap;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::download::{ApkDownloader, ProgressSink, package_filename};
use crate::extract::{
    AppDetail, ExtractError, extract_app_detail, extract_first_entry, extract_listing_outcomes,
    extract_release_outcomes,
};
use crate::fetch::{Page, PageFetcher};
use crate::record::{AppInfo, SearchResult};

/// Public host serving search, detail, and versions pages.
pub const DEFAULT_BASE_URL: &str = "https://apkpure.com";

/// Host serving package payloads for direct download.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://d.apkpure.com";

/// Client for the app catalog.
///
/// One instance is reusable across operations; each call is independent and
/// at most one request is in flight per client at a time.
#[derive(Debug)]
pub struct ApkPure {
    fetcher: PageFetcher,
    base_url: String,
    download_base_url: String,
    downloader: ApkDownloader,
}

impl Default for ApkPure {
    fn default() -> Self {
        Self::new()
    }
}

impl ApkPure {
    /// Creates a client against the public hosts.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP clients cannot be built from their
    /// static configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_urls(PageFetcher::new(), DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_BASE_URL)
    }

    /// Creates a client whose page requests carry `headers` instead of the
    /// default header set.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP clients cannot be built from their
    /// static configuration.
    #[must_use]
    pub fn with_headers(headers: HeaderMap) -> Self {
        Self::with_base_urls(
            PageFetcher::with_headers(headers),
            DEFAULT_BASE_URL,
            DEFAULT_DOWNLOAD_BASE_URL,
        )
    }

    /// Creates a client against explicit hosts.
    ///
    /// This is how tests point the client at a mock server; production
    /// callers normally use [`ApkPure::new`].
    ///
    /// # Panics
    ///
    /// Panics if the downloader's HTTP client cannot be built from its
    /// static configuration.
    #[must_use]
    pub fn with_base_urls(
        fetcher: PageFetcher,
        base_url: impl Into<String>,
        download_base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            download_base_url: download_base_url.into(),
            downloader: ApkDownloader::new(),
        }
    }

    /// Replaces the downloader, e.g. to redirect output under a test
    /// directory.
    #[must_use]
    pub fn with_downloader(mut self, downloader: ApkDownloader) -> Self {
        self.downloader = downloader;
        self
    }

    /// Searches the catalog and returns every extractable result in page
    /// order, the "first/best match" entry first.
    ///
    /// An empty list is a valid outcome (nothing matched); entries the page
    /// renders but the extractor cannot complete are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidQuery`] for a blank query, or a fetch
    /// error for the search page.
    #[instrument(skip(self))]
    pub async fn search_all(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let query = validated_query(query)?;
        let url = self.search_url(query);
        let page = self.fetcher.fetch(&url).await?;
        let results = collect_search_results(&page);
        debug!(count = results.len(), "search results extracted");
        Ok(results)
    }

    /// Returns the first search result whose title equals `title`
    /// (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NoExactMatch`] when no result title matches,
    /// plus everything [`ApkPure::search_all`] can fail with.
    #[instrument(skip(self))]
    pub async fn search_exact(&self, title: &str) -> Result<SearchResult, CatalogError> {
        let results = self.search_all(title).await?;
        results
            .into_iter()
            .find(|record| record.app_title == title)
            .ok_or_else(|| CatalogError::no_exact_match(title))
    }

    /// Returns only the page's "first/best match" entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AppNotFound`] when the page has no primary
    /// entry, [`CatalogError::Extract`] when it has one that cannot be
    /// extracted, or [`CatalogError::InvalidQuery`] for a blank query.
    #[instrument(skip(self))]
    pub async fn search_top(&self, query: &str) -> Result<SearchResult, CatalogError> {
        let query = validated_query(query)?;
        let url = self.search_url(query);
        let page = self.fetcher.fetch(&url).await?;
        match first_search_result(&page) {
            Some(Ok(record)) => Ok(record),
            Some(Err(error)) => Err(CatalogError::extract(url, error)),
            None => Err(CatalogError::app_not_found(query)),
        }
    }

    /// Version history for an app, newest first in page order.
    ///
    /// The app is resolved through a search for `title` or `package_name`
    /// (at least one required; the package name takes precedence when both
    /// could match a record). Each release entry is overlaid onto the
    /// resolved record, so every returned element carries the full identity
    /// field set plus that release's version data. Release rows without a
    /// download anchor (the trailing "see more" row) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] when neither identifier is
    /// given, [`CatalogError::NoMatch`] when no search result matches, plus
    /// fetch errors for either page.
    #[instrument(skip(self))]
    pub async fn versions(
        &self,
        title: Option<&str>,
        package_name: Option<&str>,
    ) -> Result<Vec<SearchResult>, CatalogError> {
        let query = title.or(package_name).ok_or_else(|| {
            CatalogError::invalid_argument("an app title or a package name is required")
        })?;
        let results = self.search_all(query).await?;
        let target = results
            .into_iter()
            .find(|record| matches_target(record, title, package_name))
            .ok_or_else(|| CatalogError::no_match(query))?;

        let versions_url = format!("{}/versions", self.absolutize(&target.package_url));
        let page = self.fetcher.fetch(&versions_url).await?;
        let versions = collect_versions(&page, &target);
        debug!(
            app = %target.package_name,
            count = versions.len(),
            "version history assembled"
        );
        Ok(versions)
    }

    /// The newest listed release of an app.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NoVersions`] when the history is empty, plus
    /// everything [`ApkPure::versions`] can fail with.
    #[instrument(skip(self))]
    pub async fn latest_version(
        &self,
        title: Option<&str>,
        package_name: Option<&str>,
    ) -> Result<SearchResult, CatalogError> {
        let app = title.or(package_name).ok_or_else(|| {
            CatalogError::invalid_argument("an app title or a package name is required")
        })?;
        self.versions(title, package_name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::no_versions(app))
    }

    /// Full metadata for an app resolved by exact title.
    ///
    /// Fetches the detail page and the version history; unlike search
    /// listings, a detail page missing any required element fails the whole
    /// call rather than producing a partial record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NoExactMatch`] when the title resolves
    /// nothing, [`CatalogError::DetailParse`] for a structurally broken
    /// detail page, plus fetch errors for any of the three pages involved.
    #[instrument(skip(self))]
    pub async fn info(&self, title: &str) -> Result<AppInfo, CatalogError> {
        let record = self.search_exact(title).await?;
        let detail_url = self.absolutize(&record.package_url);
        let page = self.fetcher.fetch(&detail_url).await?;
        let detail = parse_app_detail(&page)?;
        let older_versions = self.versions(Some(title), None).await?;
        Ok(assemble_app_info(detail, older_versions))
    }

    /// Downloads an app package and returns the absolute path of the
    /// written file.
    ///
    /// Target resolution, in order:
    ///
    /// - `record` given: used as-is (`version` is ignored).
    /// - `title` given, `version` given: the history entry whose
    ///   `package_version` equals `version`.
    /// - `title` given, no `version`: the latest listed release.
    ///
    /// The payload URL is `<download-base>/b/XAPK/<package_name>` with the
    /// release's `versionCode`, and the file lands under the downloader's
    /// `apks/` directory as `<package_name>_<package_version>.xapk`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidArgument`] when neither `record` nor
    /// `title` is given, [`CatalogError::VersionNotFound`] when a requested
    /// version is not listed, [`CatalogError::Download`] when the transfer
    /// itself fails, plus any resolution error.
    #[instrument(skip(self, record, progress))]
    pub async fn download(
        &self,
        record: Option<&SearchResult>,
        title: Option<&str>,
        version: Option<&str>,
        progress: &dyn ProgressSink,
    ) -> Result<PathBuf, CatalogError> {
        if record.is_none() && title.is_none() {
            return Err(CatalogError::invalid_argument(
                "a search result record or an app title is required",
            ));
        }
        let target = match (record, version) {
            (Some(record), _) => record.clone(),
            (None, None) => self.latest_version(title, None).await?,
            (None, Some(version)) => self.find_version(title, version).await?,
        };

        let url = self.package_download_url(&target);
        let filename = package_filename(&target.package_name, &target.package_version);
        info!(
            app = %target.package_name,
            version = %target.package_version,
            "downloading package"
        );
        self.downloader
            .download(&url, &filename, progress)
            .await
            .map_err(|error| CatalogError::download(target.package_name.clone(), error))
    }

    /// History entry with an exact `package_version` match.
    async fn find_version(
        &self,
        title: Option<&str>,
        version: &str,
    ) -> Result<SearchResult, CatalogError> {
        let app = title.unwrap_or_default();
        self.versions(title, None)
            .await?
            .into_iter()
            .find(|record| record.package_version == version)
            .ok_or_else(|| CatalogError::version_not_found(app, version))
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/search?q={}", self.base_url, urlencoding::encode(query))
    }

    fn package_download_url(&self, record: &SearchResult) -> String {
        format!(
            "{}/b/XAPK/{}?versionCode={}",
            self.download_base_url, record.package_name, record.package_version_code
        )
    }

    /// Resolves a page-relative href against the store base URL.
    ///
    /// Absolute URLs pass through, protocol-relative ones get `https:`, and
    /// anything else is joined onto the base (with a plain concatenation
    /// fallback should the configured base itself not parse).
    fn absolutize(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            return href.to_string();
        }
        if href.starts_with("//") {
            return format!("https:{href}");
        }
        Url::parse(&self.base_url)
            .ok()
            .and_then(|base| base.join(href).ok())
            .map_or_else(
                || {
                    format!(
                        "{}/{}",
                        self.base_url.trim_end_matches('/'),
                        href.trim_start_matches('/')
                    )
                },
                |joined| joined.to_string(),
            )
    }
}

/// Trimmed query, rejecting blank input.
fn validated_query(query: &str) -> Result<&str, CatalogError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidQuery);
    }
    Ok(trimmed)
}

/// Whether `record` is the app the caller asked for. The package name is
/// checked before the title so an exact package match wins over a title
/// collision.
fn matches_target(record: &SearchResult, title: Option<&str>, package_name: Option<&str>) -> bool {
    package_name.is_some_and(|package| record.package_name == package)
        || title.is_some_and(|title| record.app_title == title)
}

fn collect_search_results(page: &Page) -> Vec<SearchResult> {
    let document = page.document();
    let mut results = Vec::new();
    for outcome in extract_listing_outcomes(&document) {
        match outcome {
            Ok(record) => results.push(record),
            Err(error) => {
                warn!(url = page.url(), error = %error, "skipping malformed search entry");
            }
        }
    }
    results
}

fn first_search_result(page: &Page) -> Option<Result<SearchResult, ExtractError>> {
    extract_first_entry(&page.document())
}

fn collect_versions(page: &Page, target: &SearchResult) -> Vec<SearchResult> {
    let document = page.document();
    let mut versions = Vec::new();
    for outcome in extract_release_outcomes(&document) {
        match outcome {
            Ok(release) => versions.push(target.with_release(
                &release.version,
                &release.download_link,
                &release.version_code,
            )),
            Err(error) => {
                debug!(url = page.url(), error = %error, "skipping version row");
            }
        }
    }
    versions
}

fn parse_app_detail(page: &Page) -> Result<AppDetail, CatalogError> {
    extract_app_detail(&page.document())
        .map_err(|error| CatalogError::detail_parse(page.url(), error))
}

fn assemble_app_info(detail: AppDetail, older_versions: Vec<SearchResult>) -> AppInfo {
    AppInfo {
        app_title: detail.app_title,
        rating: detail.rating,
        date: detail.date,
        latest_version: detail.latest_version,
        description: detail.description,
        developer: detail.developer,
        package_name: detail.package_name,
        package_version_code: detail.package_version_code,
        download_link: detail.download_link,
        older_versions,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::download::NullProgress;
    use crate::test_support::socket_guard::start_mock_server_or_skip;

    /// Search page: one first/best entry (Telegram) plus one ranked entry
    /// (Telegram X), both with page-relative detail URLs.
    const SEARCH_PAGE: &str = r#"<html><body>
        <div class="first">
          <a class="first-info" href="/telegram/org.telegram.messenger">
            <img src="https://images.example.com/telegram.png">
            <p class="p1">Telegram</p>
            <p class="p2">Telegram FZ-LLC</p>
          </a>
          <a class="is-download" href="https://d.example.com/latest"
             data-dt-app="org.telegram.messenger" data-dt-filesize="48700000"
             data-dt-version="10.0.5" data-dt-versioncode="41001">Download</a>
        </div>
        <ul id="search-res">
          <li data-dt-app="org.thunderdog.challegram" data-dt-filesize="31200000"
              data-dt-version="0.26.3" data-dt-versioncode="1674">
            <a class="dd" href="/telegram-x/org.thunderdog.challegram">
              <p class="p1">Telegram X</p>
              <p class="p2">Telegram LLC</p>
            </a>
            <a class="da" href="https://d.example.com/telegram-x">Download</a>
          </li>
        </ul>
      </body></html>"#;

    const VERSIONS_PAGE: &str = r#"<html><body>
        <ul class="ver-wrap">
          <li>
            <a class="ver_download_link" href="/telegram/org.telegram.messenger/download/41001"
               data-dt-version="10.0.5" data-dt-versioncode="41001">10.0.5</a>
          </li>
          <li>
            <a class="ver_download_link" href="/telegram/org.telegram.messenger/download/40902"
               data-dt-version="10.0.4" data-dt-versioncode="40902">10.0.4</a>
          </li>
          <li class="more"><a href="/more">See older versions</a></li>
        </ul>
      </body></html>"#;

    const DETAIL_PAGE: &str = r#"<html><body>
        <div class="detail_banner">
          <div class="title_link"><h1>Telegram</h1></div>
          <span class="rating">4.5</span>
          <p class="date">Sep 30, 2023</p>
          <p class="details_sdk">Latest Version <span>10.0.5</span> by <span>Telegram FZ-LLC</span></p>
          <a class="download_apk_news" href="https://d.example.com/b/XAPK/org.telegram.messenger?versionCode=41001"
             data-dt-package_name="org.telegram.messenger" data-dt-version_code="41001">Download APK</a>
        </div>
        <div class="translate-content">Pure instant messaging.</div>
      </body></html>"#;

    fn test_client(server: &MockServer) -> ApkPure {
        ApkPure::with_base_urls(PageFetcher::new(), server.uri(), server.uri())
    }

    async fn mount_search(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    async fn mount_versions(server: &MockServer, package_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{package_path}/versions")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_validated_query_trims_and_rejects_blank() {
        assert_eq!(validated_query("  Telegram ").unwrap(), "Telegram");
        assert!(matches!(
            validated_query("   "),
            Err(CatalogError::InvalidQuery)
        ));
    }

    #[test]
    fn test_matches_target_prefers_package_name() {
        let record = SearchResult {
            app_title: "Telegram".to_string(),
            package_name: "org.telegram.messenger".to_string(),
            ..SearchResult::default()
        };
        assert!(matches_target(
            &record,
            None,
            Some("org.telegram.messenger")
        ));
        assert!(matches_target(&record, Some("Telegram"), None));
        assert!(!matches_target(&record, Some("Telegram X"), Some("other")));
        assert!(!matches_target(&record, None, None));
    }

    #[test]
    fn test_absolutize_passes_through_absolute_urls() {
        let client = ApkPure::new();
        assert_eq!(
            client.absolutize("https://apkpure.com/telegram"),
            "https://apkpure.com/telegram"
        );
        assert_eq!(
            client.absolutize("http://mirror.example.com/x"),
            "http://mirror.example.com/x"
        );
    }

    #[test]
    fn test_absolutize_upgrades_protocol_relative() {
        let client = ApkPure::new();
        assert_eq!(
            client.absolutize("//cdn.example.com/icon.png"),
            "https://cdn.example.com/icon.png"
        );
    }

    #[test]
    fn test_absolutize_joins_relative_path_onto_base() {
        let client = ApkPure::new();
        assert_eq!(
            client.absolutize("/telegram/org.telegram.messenger"),
            "https://apkpure.com/telegram/org.telegram.messenger"
        );
    }

    #[test]
    fn test_absolutize_concatenates_when_base_does_not_parse() {
        let client =
            ApkPure::with_base_urls(PageFetcher::new(), "not a base url", "https://d.example.com");
        assert_eq!(client.absolutize("/x/y"), "not a base url/x/y");
    }

    #[test]
    fn test_package_download_url_carries_version_code() {
        let client = ApkPure::new();
        let record = SearchResult {
            package_name: "org.telegram.messenger".to_string(),
            package_version_code: "41001".to_string(),
            ..SearchResult::default()
        };
        assert_eq!(
            client.package_download_url(&record),
            "https://d.apkpure.com/b/XAPK/org.telegram.messenger?versionCode=41001"
        );
    }

    #[tokio::test]
    async fn test_search_all_rejects_blank_query() {
        let client = ApkPure::new();
        let err = client.search_all("   ").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidQuery));
    }

    #[tokio::test]
    async fn test_versions_requires_title_or_package_name() {
        let client = ApkPure::new();
        let err = client.versions(None, None).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_download_requires_record_or_title() {
        let client = ApkPure::new();
        let err = client
            .download(None, None, None, &NullProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_search_all_returns_entries_in_page_order() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        let client = test_client(&server);

        let results = client.search_all("Telegram").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].app_title, "Telegram");
        assert_eq!(results[0].package_name, "org.telegram.messenger");
        assert_eq!(
            results[0].package_url, "/telegram/org.telegram.messenger",
            "package URLs stay page-relative until an operation needs them"
        );
        assert_eq!(results[1].app_title, "Telegram X");
    }

    #[tokio::test]
    async fn test_search_all_drops_malformed_entries() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let page = SEARCH_PAGE.replace(
            "</ul>",
            r#"<li><p class="p1">Broken entry, no anchors</p></li></ul>"#,
        );
        mount_search(&server, &page).await;
        let client = test_client(&server);

        let results = client.search_all("Telegram").await.unwrap();

        assert_eq!(results.len(), 2, "broken entry dropped, the rest kept");
    }

    #[tokio::test]
    async fn test_search_exact_is_case_sensitive() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        let client = test_client(&server);

        let record = client.search_exact("Telegram").await.unwrap();
        assert_eq!(record.package_name, "org.telegram.messenger");

        let err = client.search_exact("telegram").await.unwrap_err();
        assert!(matches!(err, CatalogError::NoExactMatch { .. }));
    }

    #[tokio::test]
    async fn test_search_top_returns_only_the_primary_entry() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        let client = test_client(&server);

        let record = client.search_top("Telegram").await.unwrap();

        assert_eq!(record.app_title, "Telegram");
    }

    #[tokio::test]
    async fn test_search_top_without_primary_entry_fails() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        let page = r#"<html><body><ul id="search-res"></ul></body></html>"#;
        mount_search(&server, page).await;
        let client = test_client(&server);

        let err = client.search_top("Telegram").await.unwrap_err();

        assert!(matches!(err, CatalogError::AppNotFound { .. }));
    }

    #[tokio::test]
    async fn test_versions_overlays_release_rows_onto_target() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(&server, "/telegram/org.telegram.messenger", VERSIONS_PAGE).await;
        let client = test_client(&server);

        let versions = client.versions(Some("Telegram"), None).await.unwrap();

        assert_eq!(versions.len(), 2, "trailing row without anchor skipped");
        assert_eq!(versions[0].app_title, "Telegram", "identity fields kept");
        assert_eq!(versions[0].package_version, "10.0.5");
        assert_eq!(versions[0].package_version_code, "41001");
        assert_eq!(
            versions[0].download_link,
            "/telegram/org.telegram.messenger/download/41001"
        );
        assert_eq!(versions[1].package_version, "10.0.4");
    }

    #[tokio::test]
    async fn test_versions_resolves_target_by_package_name() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(&server, "/telegram-x/org.thunderdog.challegram", VERSIONS_PAGE).await;
        let client = test_client(&server);

        let versions = client
            .versions(None, Some("org.thunderdog.challegram"))
            .await
            .unwrap();

        assert_eq!(versions[0].app_title, "Telegram X");
        assert_eq!(versions[0].package_name, "org.thunderdog.challegram");
    }

    #[tokio::test]
    async fn test_versions_without_matching_record_fails() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        let client = test_client(&server);

        let err = client.versions(Some("WhatsApp"), None).await.unwrap_err();

        assert!(matches!(err, CatalogError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn test_latest_version_is_the_first_listed_release() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(&server, "/telegram/org.telegram.messenger", VERSIONS_PAGE).await;
        let client = test_client(&server);

        let latest = client.latest_version(Some("Telegram"), None).await.unwrap();

        assert_eq!(latest.package_version, "10.0.5");
        assert_eq!(latest.package_version_code, "41001");
    }

    #[tokio::test]
    async fn test_latest_version_with_empty_history_fails() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(
            &server,
            "/telegram/org.telegram.messenger",
            "<html><body><p>no list</p></body></html>",
        )
        .await;
        let client = test_client(&server);

        let err = client
            .latest_version(Some("Telegram"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NoVersions { .. }));
    }

    #[tokio::test]
    async fn test_info_assembles_detail_and_history() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        Mock::given(method("GET"))
            .and(path("/telegram/org.telegram.messenger"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
            .mount(&server)
            .await;
        mount_versions(&server, "/telegram/org.telegram.messenger", VERSIONS_PAGE).await;
        let client = test_client(&server);

        let info = client.info("Telegram").await.unwrap();

        assert_eq!(info.app_title, "Telegram");
        assert_eq!(info.rating, "4.5");
        assert_eq!(info.latest_version, "10.0.5");
        assert_eq!(info.developer, "Telegram FZ-LLC");
        assert_eq!(info.package_name, "org.telegram.messenger");
        assert_eq!(info.description, "Pure instant messaging.");
        assert_eq!(info.older_versions.len(), 2);
        assert_eq!(info.older_versions[1].package_version, "10.0.4");
    }

    #[tokio::test]
    async fn test_info_structurally_broken_detail_page_fails_whole_call() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        Mock::given(method("GET"))
            .and(path("/telegram/org.telegram.messenger"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>not an app page</p></body></html>"),
            )
            .mount(&server)
            .await;
        let client = test_client(&server);

        let err = client.info("Telegram").await.unwrap_err();

        match err {
            CatalogError::DetailParse { url, .. } => {
                assert!(url.contains("/telegram/org.telegram.messenger"));
            }
            other => panic!("expected DetailParse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_unlisted_version_fails() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(&server, "/telegram/org.telegram.messenger", VERSIONS_PAGE).await;
        let client = test_client(&server);

        let err = client
            .download(None, Some("Telegram"), Some("1.0.0"), &NullProgress)
            .await
            .unwrap_err();

        match err {
            CatalogError::VersionNotFound { app, version } => {
                assert_eq!(app, "Telegram");
                assert_eq!(version, "1.0.0");
            }
            other => panic!("expected VersionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_latest_streams_package_into_apks_dir() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(&server, "/telegram/org.telegram.messenger", VERSIONS_PAGE).await;
        Mock::given(method("GET"))
            .and(path("/b/XAPK/org.telegram.messenger"))
            .and(query_param("versionCode", "41001"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"xapk payload".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server)
            .with_downloader(ApkDownloader::with_root(dir.path()));

        let path = client
            .download(None, Some("Telegram"), None, &NullProgress)
            .await
            .unwrap();

        assert!(path.is_absolute());
        assert!(path.ends_with("apks/org.telegram.messenger_10.0.5.xapk"));
        assert_eq!(std::fs::read(&path).unwrap(), b"xapk payload");
    }

    #[tokio::test]
    async fn test_download_with_record_skips_resolution_entirely() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        // No search or versions mocks mounted: any resolution attempt 404s.
        Mock::given(method("GET"))
            .and(path("/b/XAPK/com.example.direct"))
            .and(query_param("versionCode", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"payload".to_vec()))
            .mount(&server)
            .await;

        let record = SearchResult {
            app_title: "Direct".to_string(),
            package_name: "com.example.direct".to_string(),
            package_version: "1.0.7".to_string(),
            package_version_code: "7".to_string(),
            ..SearchResult::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server)
            .with_downloader(ApkDownloader::with_root(dir.path()));

        let path = client
            .download(Some(&record), None, Some("ignored"), &NullProgress)
            .await
            .unwrap();

        assert!(path.ends_with("apks/com.example.direct_1.0.7.xapk"));
    }

    #[tokio::test]
    async fn test_download_failure_carries_app_context() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_search(&server, SEARCH_PAGE).await;
        mount_versions(&server, "/telegram/org.telegram.messenger", VERSIONS_PAGE).await;
        // No payload mock: the download host 404s.
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server)
            .with_downloader(ApkDownloader::with_root(dir.path()));

        let err = client
            .download(None, Some("Telegram"), None, &NullProgress)
            .await
            .unwrap_err();

        match err {
            CatalogError::Download { app, .. } => assert_eq!(app, "org.telegram.messenger"),
            other => panic!("expected Download, got {other:?}"),
        }
    }
}
