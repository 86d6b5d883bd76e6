//! Filename construction and sanitization for package downloads.
//!
//! Download names are deterministic (`{package}_{version}.xapk`), so this
//! module only has to keep those names filesystem-safe and understand the
//! Content-Disposition header well enough to log what the server wanted.

use std::path::{Component, Path};

/// Extension used for catalog bundle downloads.
pub(crate) const PACKAGE_EXTENSION: &str = ".xapk";

/// Builds the deterministic on-disk name for a package release:
/// `{package_name}_{package_version}.xapk`, sanitized for the filesystem.
#[must_use]
pub fn package_filename(package_name: &str, package_version: &str) -> String {
    sanitize_filename(&format!(
        "{package_name}_{package_version}{PACKAGE_EXTENSION}"
    ))
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` plus control characters) and rewrites dot-only
/// segments so the name can never escape its directory.
#[must_use]
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Parses a Content-Disposition header to extract the server's filename.
///
/// Handles quoted, unquoted, and RFC 5987 (`filename*=UTF-8''...`) forms.
/// The download path never uses this value; it is surfaced in logs so
/// divergence from the deterministic name stays visible.
#[must_use]
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    parse_rfc5987_filename(header).or_else(|| parse_plain_filename(header))
}

/// `filename*=charset'language'percent-encoded-value` (RFC 5987).
fn parse_rfc5987_filename(header: &str) -> Option<String> {
    let start = header.find("filename*=")? + "filename*=".len();
    let value = header[start..].trim();
    let encoded = &value[value.find("''")? + 2..];
    let end = encoded.find(';').unwrap_or(encoded.len());
    let encoded_name = encoded[..end].trim();
    urlencoding::decode(encoded_name)
        .ok()
        .map(std::borrow::Cow::into_owned)
}

/// `filename="quoted.xapk"` or `filename=bare.xapk`.
fn parse_plain_filename(header: &str) -> Option<String> {
    let start = header.find("filename=")? + "filename=".len();
    let value = header[start..].trim();

    if let Some(stripped) = value.strip_prefix('"') {
        let end = stripped.find('"')?;
        return Some(stripped[..end].to_string());
    }

    let end = value.find(';').unwrap_or(value.len());
    let filename = value[..end].trim();
    (!filename.is_empty()).then(|| filename.to_string())
}
