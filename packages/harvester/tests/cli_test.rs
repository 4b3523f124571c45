//! Binary-level tests for the local-file subcommands and input validation.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("kenpo_lawdata.xml")
}

fn harvester() -> Command {
    Command::cargo_bin("roppo-harvester").unwrap()
}

#[test]
fn test_parse_prints_json() {
    let output = harvester()
        .arg("parse")
        .arg(fixture_path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["title"], "日本国憲法");
    assert_eq!(json["articles"][4]["key"], "第100条");
}

#[test]
fn test_parse_prints_yaml() {
    harvester()
        .args(["parse", "--format", "yaml"])
        .arg(fixture_path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("title: 日本国憲法"));
}

#[test]
fn test_parse_missing_file() {
    harvester()
        .args(["parse", "does-not-exist.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_parse_malformed_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file = temp_dir.path().join("broken.xml");
    fs::write(&file, "<Law><LawBody>").unwrap();

    harvester()
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Statute parsing failed"));
}

#[test]
fn test_search() {
    harvester()
        .arg("search")
        .arg(fixture_path())
        .arg("交戦権")
        .assert()
        .success()
        .stdout(predicate::str::contains("第9条"))
        .stdout(predicate::str::contains("Matched 1 of 5 articles"));
}

#[test]
fn test_search_without_hits() {
    harvester()
        .arg("search")
        .arg(fixture_path())
        .arg("地方公共団体")
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched 0 of 5 articles"));
}

#[test]
fn test_inspect() {
    let output = harvester()
        .arg("inspect")
        .arg(fixture_path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["title"], "日本国憲法");
    assert_eq!(json["hasPreamble"], true);
    assert_eq!(json["counts"]["mainDirect"], 0);
    assert_eq!(json["counts"]["mainNested"], 4);
}

#[test]
fn test_glossary() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file = temp_dir.path().join("teigi.xml");
    fs::write(
        &file,
        r#"<Law><LawBody><LawTitle>行政手続法</LawTitle><MainProvision>
          <Article Num="2"><ArticleCaption>（定義）</ArticleCaption>
            <Paragraph Num="1"><ParagraphSentence><Sentence>この法律において「法令」とは、法律、法律に基づく命令及び条例をいう。</Sentence></ParagraphSentence></Paragraph>
          </Article>
        </MainProvision></LawBody></Law>"#,
    )
    .unwrap();

    harvester()
        .arg("glossary")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("法令 法律、法律に基づく命令及び条例 (第2条)"));

    harvester()
        .args(["glossary", "--format", "json"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"articleKey\": \"第2条\""));
}

#[test]
fn test_download_rejects_invalid_law_id() {
    harvester()
        .args(["download", "../../etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid law ID format"));
}

#[test]
fn test_download_rejects_missing_output_dir() {
    harvester()
        .args(["download", "321CONSTITUTION", "--output", "/nonexistent/roppo-out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output directory does not exist"));
}
