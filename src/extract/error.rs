//! Error types for markup extraction.

use thiserror::Error;

use crate::record::RecordError;

/// Errors that can occur pulling fields out of catalog markup.
///
/// At listing level these are recovered as per-entry skips; at detail level
/// they are fatal for the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// An identity field missing from both its primary and fallback selectors
    #[error(
        "cannot extract '{field}': no element matched '{primary}' or '{fallback}'\n  Suggestion: the catalog markup may have changed; capture the page and update the selector table"
    )]
    FieldMissing {
        /// The record field being extracted
        field: &'static str,
        /// Primary CSS selector
        primary: &'static str,
        /// Fallback CSS selector
        fallback: &'static str,
    },

    /// A structurally required element is absent
    #[error(
        "required element '{element}' ({selector}) is missing\n  Suggestion: verify the URL renders the expected page in a browser; the markup may have changed"
    )]
    ElementMissing {
        /// Human name of the element
        element: &'static str,
        /// CSS selector that found nothing
        selector: &'static str,
    },

    /// A required attribute is absent from an element that was found
    #[error(
        "element '{element}' has no '{attribute}' attribute\n  Suggestion: the catalog moved this value; capture the page and update the attribute table"
    )]
    AttributeMissing {
        /// Human name of the element
        element: &'static str,
        /// The missing attribute
        attribute: &'static str,
    },

    /// The SDK info block no longer matches its positional layout
    #[error(
        "SDK info block violates its positional layout at child {index}: {reason}\n  Suggestion: the page structure changed; update the structural contract constants in one place"
    )]
    SdkInfoLayout {
        /// Which child node index was read
        index: usize,
        /// What was found instead
        reason: String,
    },

    /// Extracted fields were rejected at record construction
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ExtractError {
    /// Creates a `FieldMissing` error for an exhausted selector chain.
    #[must_use]
    pub fn field_missing(field: &'static str, primary: &'static str, fallback: &'static str) -> Self {
        Self::FieldMissing {
            field,
            primary,
            fallback,
        }
    }

    /// Creates an `ElementMissing` error for a required element.
    #[must_use]
    pub fn element_missing(element: &'static str, selector: &'static str) -> Self {
        Self::ElementMissing { element, selector }
    }

    /// Creates an `AttributeMissing` error for a present element lacking a value.
    #[must_use]
    pub fn attribute_missing(element: &'static str, attribute: &'static str) -> Self {
        Self::AttributeMissing { element, attribute }
    }

    /// Creates an `SdkInfoLayout` error for a positional contract violation.
    #[must_use]
    pub fn sdk_info_layout(index: usize, reason: impl Into<String>) -> Self {
        Self::SdkInfoLayout {
            index,
            reason: reason.into(),
        }
    }
}
