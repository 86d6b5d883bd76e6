//! APKPure Catalog Client Library
//!
//! This library provides a typed client for the APKPure app catalog:
//! searching apps, listing version histories, reading full app metadata,
//! and downloading package files.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - High-level client operations (search, versions, info, download)
//! - [`fetch`] - Page fetching with access-denial bypass and protection-page retry
//! - [`extract`] - CSS-selector extraction of listing, versions, and detail pages
//! - [`record`] - Typed result records with parsed-version ordering
//! - [`download`] - Streaming package downloader with size-based resumability

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod download;
pub mod extract;
pub mod fetch;
pub mod record;

mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use catalog::{ApkPure, CatalogError, DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_BASE_URL};
pub use download::{ApkDownloader, DownloadError, NullProgress, ProgressSink, package_filename};
pub use extract::ExtractError;
pub use fetch::{FetchError, InterstitialPolicy, Page, PageFetcher, Sleeper};
pub use record::{AppInfo, RecordError, SearchResult};
