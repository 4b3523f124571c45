//! Roppo Harvester - Download Japanese statutes from the e-Gov law API.
//!
//! This crate fetches statute XML from the e-Gov `lawdata` endpoint,
//! normalizes it with [`roppo_statute`] and saves the result as JSON or
//! YAML. The CLI also works on local XML files for parsing, searching,
//! glossary extraction and structure inspection.
//!
//! # Example
//!
//! ```
//! use roppo_harvester::config;
//!
//! assert!(config::validate_law_id("322AC0000000067").is_ok());
//! assert_eq!(
//!     config::lawdata_url("321CONSTITUTION"),
//!     "https://laws.e-gov.go.jp/api/1/lawdata/321CONSTITUTION"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retries and a size limit
//! - [`lawdata`]: `lawdata` endpoint download and result-code check
//! - [`output`]: JSON/YAML rendering, atomic saves, terminal formatting
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main harvester service

pub mod cli;
pub mod config;
pub mod error;
pub mod harvester;
pub mod http;
pub mod lawdata;
pub mod output;

// Re-export main functions
pub use harvester::{download_statute, download_statute_from, load_statute_file, HarvestedStatute};

// Re-export commonly used items
pub use config::validate_law_id;
pub use error::{HarvesterError, Result};
pub use output::OutputFormat;
