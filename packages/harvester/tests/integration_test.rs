//! End-to-end tests for the harvester download pipeline.
//!
//! Serves an abridged `lawdata` response for the Constitution of Japan
//! (321CONSTITUTION) from a mock server. The blocking client must not run
//! on the async runtime, so every download happens in `spawn_blocking`.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use roppo_harvester::output::{save_statute, OutputFormat};
use roppo_harvester::{download_statute_from, HarvestedStatute, HarvesterError, Result};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LAW_ID: &str = "321CONSTITUTION";

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

async fn download(base_url: String, max_size: u64) -> Result<HarvestedStatute> {
    tokio::task::spawn_blocking(move || download_statute_from(&base_url, LAW_ID, max_size))
        .await
        .unwrap()
}

async fn serve(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/lawdata/{LAW_ID}")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_download_statute() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_string(load_fixture("kenpo_lawdata.xml")),
    )
    .await;

    let harvested = download(server.uri(), 1024 * 1024).await.unwrap();
    let statute = &harvested.statute;

    assert_eq!(harvested.law_id, LAW_ID);
    assert_eq!(harvested.source_url, format!("{}/lawdata/{LAW_ID}", server.uri()));
    assert_eq!(harvested.viewer_url, "https://laws.e-gov.go.jp/law/321CONSTITUTION");
    assert_eq!(statute.title.as_deref(), Some("日本国憲法"));
    assert_eq!(statute.metadata.law_number.as_deref(), Some("昭和二十一年憲法"));
    assert_eq!(statute.metadata.promulgation_date.as_deref(), Some("1946-11-03"));

    // The preamble is a bare paragraph block and gets a positional key
    let keys: Vec<&str> = statute.articles.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["art-1", "第1条", "第2条", "第9条", "第100条"]);

    let article_9 = statute.article("第9条").unwrap();
    assert_eq!(article_9.paragraphs.len(), 2);
    assert_eq!(article_9.paragraphs[1].number.as_deref(), Some("2"));
    assert!(article_9.paragraphs[1].text.contains("国の交戦権は、これを認めない。"));
    assert!(statute.articles.iter().all(|a| a.group_label.is_none()));
}

#[tokio::test]
async fn test_download_and_save() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_string(load_fixture("kenpo_lawdata.xml")),
    )
    .await;

    let harvested = download(server.uri(), 1024 * 1024).await.unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let path = save_statute(&harvested, OutputFormat::Json, Some(temp_dir.path())).unwrap();

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved["lawId"], LAW_ID);
    assert_eq!(saved["statute"]["articles"][1]["key"], "第1条");
    assert!(saved["retrievedAt"].is_string());
}

#[tokio::test]
async fn test_api_error_code() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_string(
            "<DataRoot><Result><Code>1</Code><Message>該当するデータがありません。</Message></Result></DataRoot>",
        ),
    )
    .await;

    let err = download(server.uri(), 1024).await.unwrap_err();
    match err {
        HarvesterError::Api { code, message } => {
            assert_eq!(code, "1");
            assert_eq!(message, "該当するデータがありません。");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/lawdata/{LAW_ID}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = download(server.uri(), 1024).await.unwrap_err();
    match err {
        HarvesterError::LawDownload { law_id, .. } => assert_eq!(law_id, LAW_ID),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/lawdata/{LAW_ID}")))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = download(server.uri(), 1024).await.unwrap_err();
    assert!(matches!(
        err,
        HarvesterError::RetriesExhausted { attempts: 3, .. }
    ));
}

#[tokio::test]
async fn test_response_too_large() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_string(load_fixture("kenpo_lawdata.xml")),
    )
    .await;

    let err = download(server.uri(), 100).await.unwrap_err();
    assert!(matches!(
        err,
        HarvesterError::ResponseTooLarge { limit: 100, .. }
    ));
}

#[tokio::test]
async fn test_invalid_utf8_body() {
    let server = MockServer::start().await;
    // Shift_JIS for 日本国憲法 is not valid UTF-8
    let mut body = b"<Law><LawBody><LawTitle>".to_vec();
    body.extend_from_slice(&[0x93, 0xfa, 0x96, 0x7b, 0x8d, 0x91, 0x8c, 0x9b, 0x96, 0x40]);
    body.extend_from_slice(b"</LawTitle></LawBody></Law>");
    serve(&server, ResponseTemplate::new(200).set_body_bytes(body)).await;

    let err = download(server.uri(), 1024).await.unwrap_err();
    match err {
        HarvesterError::InvalidEncoding { law_id, .. } => assert_eq!(law_id, LAW_ID),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_xml_body() {
    let server = MockServer::start().await;
    serve(
        &server,
        ResponseTemplate::new(200).set_body_string("<html><body>メンテナンス中"),
    )
    .await;

    let err = download(server.uri(), 1024).await.unwrap_err();
    assert!(matches!(err, HarvesterError::XmlParse(_)));
}
