//! End-to-end tests for statute parsing.
//!
//! Uses an abridged e-Gov rendition of the Local Autonomy Act
//! (地方自治法, 322AC0000000067) covering parts, chapters, sections, items,
//! ruby, deleted ranges and two supplementary-provision blocks.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use roppo_statute::glossary::{extract_glossary, DEFAULT_MAX_PER_ARTICLE};
use roppo_statute::inspect::inspect_shape;
use roppo_statute::search::filter_articles;
use roppo_statute::{parse, GenericNode, LabelStyle, Paragraph, ParsedStatute, StatuteMetadata};

const ORIGINAL_SUPPL_LABEL: &str = "附則（昭和二十二年法律第六十七号 1947-04-17 改正）";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn parse_fixture() -> ParsedStatute {
    init_tracing();
    parse(&load_fixture("chiho_jichi.xml"))
}

fn keys(statute: &ParsedStatute) -> Vec<&str> {
    statute.articles.iter().map(|a| a.key.as_str()).collect()
}

#[test]
fn test_title_and_metadata() {
    let statute = parse_fixture();

    assert_eq!(statute.title.as_deref(), Some("地方自治法"));
    assert_eq!(
        statute.metadata,
        StatuteMetadata {
            law_number: Some("昭和二十二年法律第六十七号".to_string()),
            promulgation_date: Some("1947-04-17".to_string()),
            enforcement_date: None,
        }
    );
}

#[test]
fn test_articles_in_document_order() {
    let statute = parse_fixture();

    assert_eq!(
        keys(&statute),
        vec![
            "第1条",
            "第1条の2",
            "第2条",
            "第3条",
            "第4条から第6条まで",
            "第7条",
            "第1条-7",
            "第2条-8",
            "第3条-9",
            "art-10",
        ]
    );
}

#[test]
fn test_keys_unique_and_non_empty() {
    let statute = parse_fixture();

    let unique: HashSet<&str> = keys(&statute).into_iter().collect();
    assert_eq!(unique.len(), statute.articles.len());
    assert!(statute.articles.iter().all(|a| !a.key.is_empty()));
}

#[test]
fn test_parse_is_idempotent() {
    let xml = load_fixture("chiho_jichi.xml");
    assert_eq!(parse(&xml), parse(&xml));
}

#[test]
fn test_article_content() {
    let statute = parse_fixture();

    let first = statute.article("第1条").unwrap();
    assert_eq!(first.title.as_deref(), Some("（目的）"));
    assert_eq!(first.paragraphs.len(), 1);
    assert!(first.paragraphs[0].text.starts_with("この法律は、地方自治の本旨に基いて"));

    let second = statute.article("第1条の2").unwrap();
    assert_eq!(second.title, None);
    assert_eq!(
        second.paragraphs[1],
        Paragraph::new(
            Some("2".to_string()),
            "国は、次に掲げる事務を重点的に担う。 一 国際社会における国家としての存立にかかわる事務 二 全国的に統一して定めることが望ましい事務"
        )
    );

    let ruby = statute.article("第3条").unwrap();
    assert_eq!(ruby.paragraphs[0].text, "普通地方公共団体の名称は、従来の名称による。");

    let empty = statute.article("第7条").unwrap();
    assert!(empty.paragraphs.is_empty());
}

#[test]
fn test_paragraph_one_label_suppressed() {
    let statute = parse_fixture();
    let style = LabelStyle::default();

    for article in &statute.articles {
        if let Some(first) = article.paragraphs.first() {
            assert_eq!(first.label(&style), "", "article {}", article.key);
        }
    }

    let second = statute.article("第1条の2").unwrap();
    assert_eq!(second.paragraphs[1].label(&style), "【第2項】");
}

#[test]
fn test_supplementary_block_shares_metadata_label() {
    let statute = parse_fixture();

    let labels: Vec<Option<&str>> = statute
        .articles
        .iter()
        .map(|a| a.group_label.as_deref())
        .collect();
    assert_eq!(&labels[..6], &[None::<&str>; 6]);
    assert_eq!(&labels[6..9], &[Some(ORIGINAL_SUPPL_LABEL); 3]);
    assert_eq!(labels[9], Some("附則（平成一一年七月一六日法律第八七号 改正）"));

    let groups = statute.groups();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[1].0, Some(ORIGINAL_SUPPL_LABEL));
    assert_eq!(groups[1].1.len(), 3);
}

#[test]
fn test_minimal_supplementary_scenario() {
    let xml = r#"<Law Era="Reiwa" Year="2" PromulgateMonth="6" PromulgateDay="12">
        <LawNum>令和二年法律第五十号</LawNum>
        <LawBody>
          <MainProvision><Article Num="1"><Paragraph Num="1"><ParagraphSentence><Sentence>本則</Sentence></ParagraphSentence></Paragraph></Article></MainProvision>
          <SupplProvision>
            <Article Num="1"><Paragraph Num="1"><ParagraphSentence><Sentence>一</Sentence></ParagraphSentence></Paragraph></Article>
            <Article Num="2"><Paragraph Num="1"><ParagraphSentence><Sentence>二</Sentence></ParagraphSentence></Paragraph></Article>
            <Article Num="3"><Paragraph Num="1"><ParagraphSentence><Sentence>三</Sentence></ParagraphSentence></Paragraph></Article>
          </SupplProvision>
        </LawBody>
    </Law>"#;

    let statute = parse(xml);
    let suppl: Vec<_> = statute.articles.iter().filter(|a| a.is_supplementary()).collect();
    assert_eq!(suppl.len(), 3);
    for article in suppl {
        assert_eq!(
            article.group_label.as_deref(),
            Some("附則（令和二年法律第五十号 2020-06-12 改正）")
        );
    }
}

#[test]
fn test_malformed_input_gives_empty_statute() {
    init_tracing();
    let statute = parse("<not-xml");
    assert_eq!(statute.title, None);
    assert!(statute.articles.is_empty());
}

#[test]
fn test_recognized_but_empty_structure() {
    let statute = parse("<Law><LawNum>令和元年法律第一号</LawNum><LawBody><LawTitle>空の法</LawTitle></LawBody></Law>");
    assert_eq!(statute.title.as_deref(), Some("空の法"));
    assert_eq!(statute.metadata.law_number.as_deref(), Some("令和元年法律第一号"));
    assert!(statute.articles.is_empty());
}

#[test]
fn test_consumers_on_fixture() {
    let statute = parse_fixture();

    let hits: Vec<&str> = filter_articles(&statute, "事務")
        .into_iter()
        .map(|a| a.key.as_str())
        .collect();
    assert_eq!(hits, vec!["第1条の2"]);

    let glossary = extract_glossary(&statute, DEFAULT_MAX_PER_ARTICLE);
    assert_eq!(glossary.len(), 1);
    assert_eq!(glossary[0].term, "普通地方公共団体");
    assert_eq!(glossary[0].definition, "都道府県及び市町村");
    assert_eq!(glossary[0].article_key, "第2条");

    let tree = GenericNode::from_xml(&load_fixture("chiho_jichi.xml")).unwrap();
    let shape = inspect_shape(&tree);
    assert_eq!(shape.counts.main_direct, 0);
    assert_eq!(shape.counts.main_nested, 6);
    assert_eq!(shape.counts.supplementary, 3);
    assert!(!shape.has_preamble);
}

#[test]
fn test_serialized_model_shape() {
    let statute = parse_fixture();
    let json = serde_json::to_value(&statute).unwrap();

    assert_eq!(json["title"], "地方自治法");
    assert_eq!(json["articles"][0]["key"], "第1条");
    assert_eq!(json["articles"][0]["paragraphs"][0]["number"], "1");
    assert_eq!(json["articles"][6]["groupLabel"], ORIGINAL_SUPPL_LABEL);
    assert!(json["articles"][0].get("groupLabel").is_none());
}
