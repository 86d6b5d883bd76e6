//! Streaming package downloads with size-based skip.
//!
//! This module downloads XAPK bundles from the catalog's download host,
//! streaming to disk so large bundles never sit in memory.
//!
//! # Features
//!
//! - Streaming downloads through a buffered writer
//! - Deterministic `{package}_{version}.xapk` filenames, sanitized
//! - Size-equality skip for files already fully on disk
//! - Renderer-agnostic per-chunk progress reporting
//!
//! # Example
//!
//! ```no_run
//! use apkpure_core::download::{ApkDownloader, NullProgress};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = ApkDownloader::new();
//! let path = downloader
//!     .download(
//!         "https://d.apkpure.com/b/XAPK/org.example.app?versionCode=42",
//!         "org.example.app_1.0.xapk",
//!         &NullProgress,
//!     )
//!     .await?;
//! println!("Downloaded to: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod filename;
mod progress;

pub use client::{APK_SUBDIR, ApkDownloader};
pub use error::DownloadError;
pub use filename::package_filename;
pub use progress::{NullProgress, ProgressSink};
