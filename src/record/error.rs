//! Error types for record construction and version comparison.

use thiserror::Error;

/// Errors that can occur building records or comparing their versions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A field name outside the closed record contract
    #[error(
        "unknown record field '{field}'\n  Suggestion: search records carry only the documented field set; extend the field table if the catalog markup gained a new attribute"
    )]
    UnknownField {
        /// The offending key
        field: String,
    },

    /// A version segment that is not an integer
    #[error(
        "cannot compare version '{version}': segment '{segment}' is not an integer\n  Suggestion: only dotted numeric versions are orderable; inspect the listing entry that produced this record"
    )]
    InvalidVersion {
        /// The full version string
        version: String,
        /// The segment that failed to parse
        segment: String,
    },
}

impl RecordError {
    /// Creates an `UnknownField` error for a key outside the record contract.
    #[must_use]
    pub fn unknown_field(field: &str) -> Self {
        Self::UnknownField {
            field: field.to_string(),
        }
    }

    /// Creates an `InvalidVersion` error for a non-numeric version segment.
    #[must_use]
    pub fn invalid_version(version: &str, segment: &str) -> Self {
        Self::InvalidVersion {
            version: version.to_string(),
            segment: segment.to_string(),
        }
    }
}
