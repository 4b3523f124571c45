//! Configuration constants and validation functions for the harvester.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{HarvesterError, Result};

/// Base URL of the e-Gov law API, version 1.
pub const EGOV_API_URL: &str = "https://laws.e-gov.go.jp/api/1";

/// Base URL of the public e-Gov law viewer.
pub const EGOV_LAW_URL: &str = "https://laws.e-gov.go.jp/law";

/// HTTP timeout in seconds.
///
/// Large codes such as the Civil Code are several megabytes of XML.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default maximum HTTP response size in bytes (50 MB).
///
/// Can be overridden via the CLI `--max-size` flag.
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 50 * 1024 * 1024;

/// Default output directory for downloaded statutes.
pub const DEFAULT_OUTPUT_DIR: &str = "statutes";

/// Text wrap width for terminal output.
pub const TEXT_WRAP_WIDTH: usize = 80;

/// e-Gov law ID: three-digit era year code, a law type code, then a serial.
///
/// Covers `322AC0000000067` (地方自治法) and `321CONSTITUTION` (日本国憲法).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LAW_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}[A-Z]{2,}[0-9A-Z_]*$").expect("valid regex"));

/// Validate e-Gov law ID format.
///
/// # Arguments
/// * `law_id` - The e-Gov law identifier to validate
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(HarvesterError::InvalidLawId)` if invalid
///
/// # Examples
/// ```
/// use roppo_harvester::config::validate_law_id;
///
/// assert!(validate_law_id("322AC0000000067").is_ok());
/// assert!(validate_law_id("321CONSTITUTION").is_ok());
/// assert!(validate_law_id("地方自治法").is_err());
/// ```
pub fn validate_law_id(law_id: &str) -> Result<()> {
    if LAW_ID_PATTERN.is_match(law_id) {
        Ok(())
    } else {
        Err(HarvesterError::InvalidLawId(law_id.to_string()))
    }
}

/// Build the `lawdata` API URL for a law.
///
/// # Arguments
/// * `law_id` - The law identifier (should be validated with `validate_law_id` first)
///
/// # Panics
/// Debug builds panic if `law_id` doesn't match the expected format.
pub fn lawdata_url(law_id: &str) -> String {
    lawdata_url_with_base(EGOV_API_URL, law_id)
}

/// Build the `lawdata` URL against another API base, such as a mirror.
pub fn lawdata_url_with_base(base_url: &str, law_id: &str) -> String {
    debug_assert!(
        LAW_ID_PATTERN.is_match(law_id),
        "law_id should be validated before calling lawdata_url"
    );
    format!("{}/lawdata/{law_id}", base_url.trim_end_matches('/'))
}

/// Sanitize a URL fragment identifier by removing problematic characters.
///
/// Japanese article keys such as `第3条の2` are kept as they are.
///
/// # Examples
/// ```
/// use roppo_harvester::config::sanitize_fragment;
///
/// assert_eq!(sanitize_fragment("第3条の2"), "第3条の2");
/// assert_eq!(sanitize_fragment("第1条<script>"), "第1条script");
/// ```
pub fn sanitize_fragment(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.' || *c == '~')
        .collect()
}

/// Build the public e-Gov viewer URL for a law, optionally anchored at an article.
///
/// # Examples
/// ```
/// use roppo_harvester::config::egov_law_url;
///
/// assert_eq!(
///     egov_law_url("321CONSTITUTION", None),
///     "https://laws.e-gov.go.jp/law/321CONSTITUTION"
/// );
/// ```
pub fn egov_law_url(law_id: &str, article: Option<&str>) -> String {
    let mut url = format!("{EGOV_LAW_URL}/{law_id}");
    if let Some(article) = article {
        url.push('#');
        url.push_str(&sanitize_fragment(article));
    }
    url
}
