//! Streaming downloader for package files.
//!
//! Downloads land under `<root>/apks/` with deterministic caller-supplied
//! names. A file whose on-disk size already equals the declared content
//! length is not re-downloaded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use super::filename::{parse_content_disposition, sanitize_filename};
use super::progress::ProgressSink;
use crate::user_agent::BROWSER_USER_AGENT;

const CONNECT_TIMEOUT_SECS: u64 = 30;
// Read timeout is generous: XAPK bundles routinely run into hundreds of MB.
const READ_TIMEOUT_SECS: u64 = 600;

/// Subdirectory of the download root where package files are stored.
pub const APK_SUBDIR: &str = "apks";

/// HTTP client for downloading package files with streaming support.
///
/// Designed to be created once and reused for multiple downloads, taking
/// advantage of connection pooling.
#[derive(Debug, Clone)]
pub struct ApkDownloader {
    client: Client,
    root: PathBuf,
}

impl Default for ApkDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl ApkDownloader {
    /// Creates a downloader rooted at the current working directory, so
    /// files land in `./apks/`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_root(root)
    }

    /// Creates a downloader whose `apks/` directory lives under `root`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        // The download host serves binaries to browser profiles, so this
        // client always identifies as one.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            root: root.into(),
        }
    }

    /// Returns the directory package files are written to.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        self.root.join(APK_SUBDIR)
    }

    /// Downloads `url` to `<root>/apks/<filename>`, streaming the body and
    /// reporting progress per chunk.
    ///
    /// When a file of the declared size already exists at the destination,
    /// the download is skipped and the existing path returned; size is the
    /// only check, content is not re-verified. On failure during streaming
    /// the partial file is left on disk.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Creating the directory or writing the file fails
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self, progress), fields(url = %url, filename = %filename))]
    pub async fn download(
        &self,
        url: &str,
        filename: &str,
        progress: &dyn ProgressSink,
    ) -> Result<PathBuf, DownloadError> {
        debug!("starting download");

        if Url::parse(url).is_err() {
            return Err(DownloadError::invalid_url(url));
        }

        let target_dir = self.target_dir();
        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| DownloadError::io(target_dir.clone(), e))?;

        let destination = target_dir.join(sanitize_filename(filename));
        let destination = std::path::absolute(&destination).unwrap_or(destination);

        let response = self.send_get(url).await?;
        log_server_filename(&response);

        let expected_bytes = declared_content_length(&response);

        // Size-equality resume: skip the transfer when the file is already
        // complete. Content is not re-verified.
        if expected_bytes > 0
            && let Ok(meta) = tokio::fs::metadata(&destination).await
            && meta.len() == expected_bytes
        {
            info!(
                path = %destination.display(),
                bytes = expected_bytes,
                "file already complete; skipping download"
            );
            return Ok(destination);
        }

        progress.begin(expected_bytes);

        let file = File::create(&destination)
            .await
            .map_err(|e| DownloadError::io(destination.clone(), e))?;

        let bytes_written = stream_to_file(file, response, url, &destination, progress).await?;
        progress.finish();

        info!(
            path = %destination.display(),
            bytes = bytes_written,
            "download complete"
        );
        Ok(destination)
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }
}

/// Streams the response body to `file`, returning bytes written.
///
/// Zero-length chunks are skipped and produce no progress event.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    progress: &dyn ProgressSink,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;
        if chunk.is_empty() {
            continue;
        }

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
        progress.advance(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Declared total size from the Content-Length header, 0 when absent.
fn declared_content_length(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Logs the server-suggested filename; the caller's deterministic name
/// always wins.
fn log_server_filename(response: &reqwest::Response) {
    if let Some(cd) = response.headers().get(CONTENT_DISPOSITION)
        && let Ok(cd_str) = cd.to_str()
        && let Some(server_name) = parse_content_disposition(cd_str)
    {
        debug!(server_filename = %server_name, "ignoring server-suggested filename");
    }
}
