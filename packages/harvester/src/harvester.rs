//! Main harvester service that ties all components together.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use roppo_statute::{try_parse, ParsedStatute};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::config::{egov_law_url, lawdata_url_with_base, validate_law_id, EGOV_API_URL};
use crate::error::Result;
use crate::http::create_client;
use crate::lawdata::download_law_xml;

/// A statute fetched from the API together with its provenance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestedStatute {
    pub law_id: String,
    /// The `lawdata` URL the XML came from.
    pub source_url: String,
    /// Public viewer page for the law.
    pub viewer_url: String,
    pub retrieved_at: DateTime<Utc>,
    pub statute: ParsedStatute,
}

/// Download and parse a statute from the e-Gov API.
///
/// # Arguments
/// * `law_id` - The e-Gov law ID (e.g., "321CONSTITUTION")
/// * `max_size` - Maximum accepted response size in bytes
pub fn download_statute(law_id: &str, max_size: u64) -> Result<HarvestedStatute> {
    download_statute_from(EGOV_API_URL, law_id, max_size)
}

/// Download and parse a statute from an API at `base_url`.
pub fn download_statute_from(
    base_url: &str,
    law_id: &str,
    max_size: u64,
) -> Result<HarvestedStatute> {
    validate_law_id(law_id)?;

    let client = create_client()?;
    let xml = download_law_xml(&client, base_url, law_id, max_size)?;
    let statute = parse_document(&xml)?;

    tracing::info!(
        law_id,
        articles = statute.articles.len(),
        "Harvested statute"
    );

    Ok(HarvestedStatute {
        law_id: law_id.to_string(),
        source_url: lawdata_url_with_base(base_url, law_id),
        viewer_url: egov_law_url(law_id, None),
        retrieved_at: Utc::now(),
        statute,
    })
}

/// Read and parse a statute XML file from disk.
pub fn load_statute_file(path: &Path) -> Result<ParsedStatute> {
    let xml = fs::read_to_string(path)?;
    parse_document(&xml)
}

/// Read a statute XML file and return its text in NFC.
pub fn read_statute_xml(path: &Path) -> Result<String> {
    Ok(normalize_input(&fs::read_to_string(path)?))
}

/// Compose text into NFC.
///
/// Text pasted from PDFs often carries decomposed kana (`か` + `゙`), which
/// would otherwise not match the precomposed `が` used by e-Gov.
pub fn normalize_input(text: &str) -> String {
    text.nfc().collect()
}

fn parse_document(xml: &str) -> Result<ParsedStatute> {
    Ok(try_parse(&normalize_input(xml))?)
}
