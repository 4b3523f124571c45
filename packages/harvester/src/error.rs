//! Error types for the harvester.
//!
//! Network failures carry the law ID they were fetching so CLI messages
//! point at the offending request.

use roppo_statute::StatuteError;
use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid e-Gov law ID format.
    #[error("Invalid law ID format: '{0}'. Expected an e-Gov law ID (e.g., 322AC0000000067)")]
    InvalidLawId(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download statute XML.
    #[error("Failed to download law {law_id}: {source}")]
    LawDownload {
        law_id: String,
        #[source]
        source: reqwest::Error,
    },

    /// Transient failures persisted through every retry.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Response body exceeds the configured limit.
    #[error("Response too large: {size} bytes (limit {limit} bytes)")]
    ResponseTooLarge { size: u64, limit: u64 },

    /// Response body is not valid UTF-8.
    #[error("Response for law {law_id} is not valid UTF-8: {source}")]
    InvalidEncoding {
        law_id: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The API answered with a non-zero result code.
    #[error("e-Gov API error {code}: {message}")]
    Api { code: String, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Statute document could not be read.
    #[error("Statute parsing failed: {0}")]
    Statute(#[from] StatuteError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
