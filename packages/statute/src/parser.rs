//! Statute parsing entry points.
//!
//! [`parse`] never fails: input that is not well-formed XML yields an empty
//! [`ParsedStatute`] and a warning, so renderers can show a "failed to load"
//! state without special-casing errors. Use [`try_parse`] to see the error.

use std::collections::HashSet;

use crate::collector::{CollectedArticle, Collector};
use crate::config::ParseConfig;
use crate::error::Result;
use crate::metadata::{extract_metadata, resolve_title};
use crate::model::{Article, ParsedStatute};
use crate::tree::GenericNode;

/// Parse statute XML with the default configuration.
///
/// # Examples
/// ```
/// use roppo_statute::parse;
///
/// let statute = parse(r#"<Law><LawBody><LawTitle>テスト法</LawTitle>
///   <MainProvision><Article Num="1"><Paragraph Num="1">
///     <ParagraphSentence><Sentence>本文。</Sentence></ParagraphSentence>
///   </Paragraph></Article></MainProvision></LawBody></Law>"#);
///
/// assert_eq!(statute.title.as_deref(), Some("テスト法"));
/// assert_eq!(statute.articles[0].key, "第1条");
///
/// let broken = parse("<not-xml");
/// assert!(broken.title.is_none() && broken.articles.is_empty());
/// ```
#[must_use]
pub fn parse(xml: &str) -> ParsedStatute {
    parse_with_config(xml, &ParseConfig::default())
}

/// Parse statute XML, degrading to an empty result on malformed input.
#[must_use]
pub fn parse_with_config(xml: &str, config: &ParseConfig) -> ParsedStatute {
    match try_parse_with_config(xml, config) {
        Ok(statute) => statute,
        Err(err) => {
            tracing::warn!(error = %err, bytes = xml.len(), "Unparsable statute document");
            ParsedStatute::default()
        }
    }
}

/// Parse statute XML, returning the error for malformed input.
pub fn try_parse(xml: &str) -> Result<ParsedStatute> {
    try_parse_with_config(xml, &ParseConfig::default())
}

/// Parse statute XML with a custom configuration, returning errors.
pub fn try_parse_with_config(xml: &str, config: &ParseConfig) -> Result<ParsedStatute> {
    let tree = GenericNode::from_xml_with_depth(xml, config.max_depth)?;
    Ok(parse_tree(&tree, config))
}

/// Parse a JSON rendition of a statute document.
pub fn parse_json(json: &str, config: &ParseConfig) -> Result<ParsedStatute> {
    let tree = GenericNode::from_json_str(json)?;
    Ok(parse_tree(&tree, config))
}

/// Build the statute model from an already parsed tree.
#[must_use]
pub fn parse_tree(tree: &GenericNode, config: &ParseConfig) -> ParsedStatute {
    let title = resolve_title(tree, &config.fields);
    let metadata = extract_metadata(tree, &config.fields);
    let collected = Collector::new(config, &metadata).collect(tree);
    let articles = assign_keys(collected);

    if articles.is_empty() {
        tracing::debug!(title = ?title, "No articles found in document");
    } else {
        tracing::debug!(title = ?title, articles = articles.len(), "Parsed statute");
    }

    ParsedStatute {
        title,
        metadata,
        articles,
    }
}

/// Assign unique keys in document order.
///
/// The key is the article number, or `art-<n>` (1-based position) when the
/// article has none. A key already taken gets `-<n>` appended, and a
/// counter after that if the suffixed key is also taken.
fn assign_keys(collected: Vec<CollectedArticle>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::with_capacity(collected.len());

    collected
        .into_iter()
        .enumerate()
        .map(|(index, article)| {
            let position = index + 1;
            let base = article
                .number
                .clone()
                .unwrap_or_else(|| format!("art-{position}"));

            let mut key = base.clone();
            if seen.contains(&key) {
                key = format!("{base}-{position}");
                let mut counter = 2;
                while seen.contains(&key) {
                    key = format!("{base}-{position}-{counter}");
                    counter += 1;
                }
            }

            seen.insert(key.clone());
            article.into_article(key)
        })
        .collect()
}
