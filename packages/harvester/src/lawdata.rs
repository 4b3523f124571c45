//! Statute XML downloading from the e-Gov `lawdata` endpoint.
//!
//! The API wraps the statute in a `DataRoot` envelope whose `Result/Code`
//! is `0` on success. Any other code carries a message in `Result/Message`.

use reqwest::blocking::Client;
use roxmltree::Document;

use crate::config::lawdata_url_with_base;
use crate::error::{HarvesterError, Result};
use crate::http::download_bytes;

/// Result code the API uses for success.
const SUCCESS_CODE: &str = "0";

/// Download the full statute XML for a law.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `base_url` - API base, normally [`crate::config::EGOV_API_URL`]
/// * `law_id` - The e-Gov law ID (e.g., "322AC0000000067")
/// * `max_size` - Maximum accepted response size in bytes
///
/// # Returns
/// The response XML, envelope included
pub fn download_law_xml(
    client: &Client,
    base_url: &str,
    law_id: &str,
    max_size: u64,
) -> Result<String> {
    let url = lawdata_url_with_base(base_url, law_id);
    let bytes = download_bytes(client, &url, max_size).map_err(|e| {
        if let HarvesterError::Http(source) = e {
            HarvesterError::LawDownload {
                law_id: law_id.to_string(),
                source,
            }
        } else {
            e
        }
    })?;

    let xml = decode_utf8(bytes, law_id)?;
    check_api_result(&xml)?;
    Ok(xml)
}

/// Decode a response body, rejecting anything that is not valid UTF-8.
fn decode_utf8(bytes: Vec<u8>, law_id: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|source| HarvesterError::InvalidEncoding {
        law_id: law_id.to_string(),
        source,
    })
}

/// Check the `Result/Code` of an API envelope.
///
/// Documents without an envelope, such as a bare `Law` element served by
/// a mirror, are accepted as they are.
pub fn check_api_result(xml: &str) -> Result<()> {
    let doc = Document::parse(xml)?;
    let Some(result) = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("Result"))
    else {
        return Ok(());
    };

    let child_text = |name: &str| {
        result
            .children()
            .find(|n| n.has_tag_name(name))
            .and_then(|n| n.text())
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    };

    let code = child_text("Code");
    if code == SUCCESS_CODE {
        return Ok(());
    }

    Err(HarvesterError::Api {
        message: child_text("Message"),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(
            decode_utf8("日本国憲法".as_bytes().to_vec(), "321CONSTITUTION").unwrap(),
            "日本国憲法"
        );

        let err = decode_utf8(vec![b'<', 0xff, b'>'], "321CONSTITUTION").unwrap_err();
        match err {
            HarvesterError::InvalidEncoding { law_id, .. } => assert_eq!(law_id, "321CONSTITUTION"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_api_result_success() {
        let xml = "<DataRoot><Result><Code>0</Code><Message/></Result><ApplData/></DataRoot>";
        assert!(check_api_result(xml).is_ok());
    }

    #[test]
    fn test_check_api_result_error_code() {
        let xml = "<DataRoot><Result><Code>1</Code><Message>該当するデータがありません。</Message></Result></DataRoot>";
        let err = check_api_result(xml).unwrap_err();
        match err {
            HarvesterError::Api { code, message } => {
                assert_eq!(code, "1");
                assert_eq!(message, "該当するデータがありません。");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_api_result_without_envelope() {
        assert!(check_api_result("<Law><LawBody/></Law>").is_ok());
    }

    #[test]
    fn test_check_api_result_not_xml() {
        let err = check_api_result("<html>").unwrap_err();
        assert!(matches!(err, HarvesterError::XmlParse(_)));
    }
}
