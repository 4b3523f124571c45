//! Error types for the statute parser.
//!
//! The public entry point [`crate::parse`] never fails; these errors are
//! returned by the fallible variants (`try_parse`, `GenericNode::from_xml`)
//! for callers that want to distinguish a broken document from an empty one.

use thiserror::Error;

/// Main error type for the statute parser library.
#[derive(Debug, Error)]
pub enum StatuteError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Document nesting exceeds the configured bound.
    #[error("Document nesting exceeds maximum depth of {depth}")]
    TooDeep { depth: usize },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for statute parser operations.
pub type Result<T> = std::result::Result<T, StatuteError>;
