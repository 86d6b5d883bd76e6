//! Page fetching with 403 bypass and interstitial retries.
//!
//! # Architecture
//!
//! - [`PageFetcher`] owns two HTTP clients: a default desktop-profile client
//!   for everyday requests, and a browser-profile client with a cookie store
//!   that is tried when the catalog answers HTTP 403.
//! - Successful bodies are screened for known protection interstitials; those
//!   are retried under an [`InterstitialPolicy`] with waits issued through a
//!   [`Sleeper`], so tests assert on attempt counts instead of real time.
//! - Transport failures and non-403 error statuses are never retried; they
//!   propagate immediately as [`FetchError`].

mod error;
mod retry;

pub use error::FetchError;
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL, InterstitialPolicy, RetryDecision};

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::extract::compile_static_selector;
use crate::user_agent::{BROWSER_USER_AGENT, DESKTOP_USER_AGENT};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Container elements that mark a protection/holding page rather than
/// catalog content. These are the wrappers the catalog's challenge screens
/// render while a request is being verified.
static INTERSTITIAL_MARKER: LazyLock<Selector> = LazyLock::new(|| {
    compile_static_selector("div#cf-wrapper, div.cf-browser-verification, div#challenge-error-title")
});

/// Abstraction over waiting between interstitial retries.
///
/// Production code sleeps on the tokio timer; tests substitute a recorder so
/// retry behavior is asserted by attempt count instead of wall-clock time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration` before the caller retries.
    async fn sleep(&self, duration: Duration);
}

/// Default [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A successfully fetched, non-interstitial catalog page.
#[derive(Debug, Clone)]
pub struct Page {
    url: String,
    body: String,
}

impl Page {
    fn new(url: impl Into<String>, body: String) -> Self {
        Self {
            url: url.into(),
            body,
        }
    }

    /// The URL the page was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw decoded response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body into a queryable document tree.
    ///
    /// The tree is rebuilt on each call and is not `Send`; parse inside a
    /// synchronous scope and pull owned data out before the next `await`.
    #[must_use]
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// HTTP page fetcher for the catalog.
///
/// Designed to be created once and reused across operations, taking
/// advantage of connection pooling in both underlying clients.
pub struct PageFetcher {
    client: Client,
    bypass_client: Client,
    policy: InterstitialPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageFetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    /// Creates a fetcher with the default desktop header profile and retry
    /// policy.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_policy(InterstitialPolicy::default())
    }

    /// Creates a fetcher with a custom interstitial retry policy.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_policy(policy: InterstitialPolicy) -> Self {
        Self::build(None, policy)
    }

    /// Creates a fetcher that sends the supplied headers on every request
    /// instead of the default desktop profile.
    ///
    /// The headers replace the default set wholesale, so callers must
    /// include their own User-Agent if they want the catalog to serve
    /// standard pages.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// headers.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_headers(headers: HeaderMap) -> Self {
        Self::build(Some(headers), InterstitialPolicy::default())
    }

    /// Replaces the sleeper used between interstitial retries.
    ///
    /// Tests use this to observe retry delays without waiting in real time.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    #[allow(clippy::expect_used)]
    fn build(headers: Option<HeaderMap>, policy: InterstitialPolicy) -> Self {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true);
        builder = match headers {
            Some(headers) => builder.default_headers(headers),
            None => builder.user_agent(DESKTOP_USER_AGENT),
        };
        let client = builder
            .build()
            .expect("failed to build HTTP client with static configuration");

        let bypass_client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .cookie_store(true)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("failed to build bypass HTTP client with static configuration");

        Self {
            client,
            bypass_client,
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Fetches `url`, bypassing 403s and retrying through interstitials.
    ///
    /// Returns the first successful, non-interstitial page. Transport
    /// failures and non-403 error statuses are not retried.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when:
    /// - The request fails at the transport level (DNS, connect, timeout).
    /// - The server returns a non-success status other than 403.
    /// - The server returns 403 and the browser-profile retry also fails.
    /// - Every attempt within the retry budget served an interstitial.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let mut attempt: u32 = 1;
        loop {
            let body = self.fetch_once(url).await?;
            if !is_interstitial(&body) {
                if attempt > 1 {
                    debug!(attempt, "page cleared after protection retries");
                }
                return Ok(Page::new(url, body));
            }

            match self.policy.should_retry(attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    info!(
                        attempt,
                        next_attempt,
                        delay_secs = delay.as_secs(),
                        "protection page served; waiting before retry"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt = next_attempt;
                }
                RetryDecision::DoNotRetry { reason } => {
                    warn!(attempt, reason = %reason, "giving up on protection page");
                    return Err(FetchError::interstitial_exhausted(url, attempt));
                }
            }
        }
    }

    /// Single fetch attempt: default client, then the bypass client on 403.
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = send(&self.client, url).await?;
        let status = response.status();

        if status.is_success() {
            return read_body(response, url).await;
        }

        if status.as_u16() != 403 {
            return Err(FetchError::status(url, status.as_u16()));
        }

        debug!("default profile refused with 403; retrying with browser profile");
        let bypass_response = send(&self.bypass_client, url).await?;
        let bypass_status = bypass_response.status();
        if bypass_status.is_success() {
            return read_body(bypass_response, url).await;
        }
        Err(FetchError::blocked(url, bypass_status.as_u16()))
    }
}

async fn send(client: &Client, url: &str) -> Result<Response, FetchError> {
    client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::transport(url, e))
}

async fn read_body(response: Response, url: &str) -> Result<String, FetchError> {
    response
        .text()
        .await
        .map_err(|e| FetchError::transport(url, e))
}

/// Returns true when the body is a protection interstitial rather than
/// catalog content.
fn is_interstitial(body: &str) -> bool {
    let document = Html::parse_document(body);
    document.select(&INTERSTITIAL_MARKER).next().is_some()
}
