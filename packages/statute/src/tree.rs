//! Generic document tree and shape-tolerant accessors.
//!
//! e-Gov documents vary in shape: the same value may be a bare string, an
//! element with attributes, or a repeated element. [`GenericNode`] keeps that
//! variance explicit, and the accessors here normalize it so the extractors
//! never have to probe for a shape themselves.

use std::collections::VecDeque;

use roxmltree::{Document, Node};

use crate::config::{ATTRIBUTE_PREFIX, MAX_DEPTH, RUBY_GLOSS_KEYS, TEXT_KEY};
use crate::error::{Result, StatuteError};

/// Untyped document tree node.
///
/// `Mapping` entries keep document order, and a key may occur more than
/// once when an element has repeated children. Use [`GenericNode::get_all`]
/// to read a key with its multiplicity normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericNode {
    /// Leaf text.
    Text(String),
    /// Ordered sequence (JSON arrays).
    Sequence(Vec<GenericNode>),
    /// Tag name to child, in document order.
    Mapping(Vec<(String, GenericNode)>),
}

impl Default for GenericNode {
    fn default() -> Self {
        Self::Mapping(Vec::new())
    }
}

impl GenericNode {
    /// Parse XML text into a tree.
    ///
    /// The root element is wrapped in a one-entry mapping keyed by its tag
    /// name, so `<DataRoot>…</DataRoot>` becomes `{DataRoot: …}`.
    ///
    /// # Examples
    /// ```
    /// use roppo_statute::tree::GenericNode;
    ///
    /// let tree = GenericNode::from_xml("<Law><LawNum>第一号</LawNum></Law>").unwrap();
    /// let law = tree.get("Law").unwrap();
    /// assert_eq!(law.get("LawNum").and_then(|n| n.as_text()), Some("第一号"));
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        Self::from_xml_with_depth(xml, MAX_DEPTH)
    }

    /// Parse XML text into a tree, rejecting documents nested deeper than `max_depth`.
    pub fn from_xml_with_depth(xml: &str, max_depth: usize) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        let node = element_to_node(root, 0, max_depth)?;
        Ok(Self::Mapping(vec![(root.tag_name().name().to_string(), node)]))
    }

    /// Parse a JSON rendition of a document.
    ///
    /// Object keys keep their source order; arrays become sequences.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self::from(&value))
    }

    /// Text of a leaf node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Entries of a mapping; empty for other shapes.
    #[must_use]
    pub fn entries(&self) -> &[(String, GenericNode)] {
        match self {
            Self::Mapping(entries) => entries,
            _ => &[],
        }
    }

    /// `true` for mappings and sequences.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// First child stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GenericNode> {
        self.entries()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// All children stored under `key`, in document order.
    ///
    /// Repeated entries and sequence values are flattened, so a single
    /// element and a list of elements read the same way.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&GenericNode> {
        self.entries()
            .iter()
            .filter(|(k, _)| k == key)
            .flat_map(|(_, v)| as_sequence(Some(v)))
            .collect()
    }

    /// Check whether a mapping has an entry under `key`.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.entries().iter().any(|(k, _)| k == key)
    }

    /// Attribute value, looked up under its `@`-prefixed key.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let key = format!("{ATTRIBUTE_PREFIX}{name}");
        self.get(&key).and_then(GenericNode::as_text)
    }

    /// Trimmed, non-empty text of the first field among `keys` that has any.
    pub fn field_text<S: AsRef<str>>(&self, keys: &[S]) -> Option<String> {
        first_non_empty_text(keys.iter().flat_map(|key| self.get_all(key.as_ref())))
    }
}

impl From<&serde_json::Value> for GenericNode {
    fn from(value: &serde_json::Value) -> Self {
        json_to_node(value, 0)
    }
}

fn json_to_node(value: &serde_json::Value, depth: usize) -> GenericNode {
    use serde_json::Value;

    if depth > MAX_DEPTH {
        tracing::warn!(max_depth = MAX_DEPTH, "JSON nesting too deep, truncating");
        return GenericNode::Text(String::new());
    }

    match value {
        Value::Null => GenericNode::Text(String::new()),
        Value::Bool(b) => GenericNode::Text(b.to_string()),
        Value::Number(n) => GenericNode::Text(n.to_string()),
        Value::String(s) => GenericNode::Text(s.clone()),
        Value::Array(items) => {
            GenericNode::Sequence(items.iter().map(|v| json_to_node(v, depth + 1)).collect())
        }
        Value::Object(map) => GenericNode::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_node(v, depth + 1)))
                .collect(),
        ),
    }
}

fn element_to_node(node: Node<'_, '_>, depth: usize, max_depth: usize) -> Result<GenericNode> {
    if depth >= max_depth {
        return Err(StatuteError::TooDeep { depth: max_depth });
    }

    let mut entries: Vec<(String, GenericNode)> = node
        .attributes()
        .map(|attr| {
            (
                format!("{ATTRIBUTE_PREFIX}{}", attr.name()),
                GenericNode::Text(attr.value().to_string()),
            )
        })
        .collect();
    let has_attributes = !entries.is_empty();
    let mut has_elements = false;
    let mut text = String::new();

    for child in node.children() {
        if child.is_element() {
            has_elements = true;
            let value = element_to_node(child, depth + 1, max_depth)?;
            entries.push((child.tag_name().name().to_string(), value));
        } else if child.is_text() {
            let run = child.text().unwrap_or_default();
            text.push_str(run);
            if !run.trim().is_empty() {
                entries.push((TEXT_KEY.to_string(), GenericNode::Text(run.to_string())));
            }
        }
    }

    if !has_attributes && !has_elements {
        return Ok(GenericNode::Text(text));
    }

    Ok(GenericNode::Mapping(entries))
}

/// Normalize a node's multiplicity into a sequence.
///
/// Absent input gives an empty vec, a sequence passes its items through and
/// any other node becomes a one-element vec.
///
/// # Examples
/// ```
/// use roppo_statute::tree::{as_sequence, GenericNode};
///
/// assert!(as_sequence(None).is_empty());
/// let leaf = GenericNode::Text("x".to_string());
/// assert_eq!(as_sequence(Some(&leaf)).len(), 1);
/// ```
#[must_use]
pub fn as_sequence(node: Option<&GenericNode>) -> Vec<&GenericNode> {
    match node {
        None => Vec::new(),
        Some(GenericNode::Sequence(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Concatenate all leaf text under a node in document order.
///
/// Attribute keys, ruby glosses and the caller's `exclude` keys (checked on
/// the node's own entries) are skipped. Content nested deeper than
/// [`MAX_DEPTH`] is dropped.
#[must_use]
pub fn deep_text(node: &GenericNode, exclude: &[&str]) -> String {
    let mut out = String::new();
    collect_text(node, exclude, 0, &mut out);
    out
}

fn collect_text(node: &GenericNode, exclude: &[&str], depth: usize, out: &mut String) {
    if depth > MAX_DEPTH {
        tracing::warn!(max_depth = MAX_DEPTH, "Text nesting too deep, truncating");
        return;
    }

    match node {
        GenericNode::Text(text) => out.push_str(text),
        GenericNode::Sequence(items) => {
            for item in items {
                collect_text(item, &[], depth + 1, out);
            }
        }
        GenericNode::Mapping(entries) => {
            for (key, value) in entries {
                if is_attribute_key(key)
                    || exclude.contains(&key.as_str())
                    || RUBY_GLOSS_KEYS.contains(&key.as_str())
                {
                    continue;
                }
                collect_text(value, &[], depth + 1, out);
            }
        }
    }
}

/// First candidate whose flattened text is not blank, trimmed.
pub fn first_non_empty_text<'a>(
    candidates: impl IntoIterator<Item = &'a GenericNode>,
) -> Option<String> {
    candidates
        .into_iter()
        .map(|node| deep_text(node, &[]))
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

/// Collapse whitespace runs (including ideographic spaces) into one space.
///
/// # Examples
/// ```
/// use roppo_statute::tree::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace(" 附\u{3000}則\n "), "附 則");
/// ```
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check whether a mapping key marks an attribute.
#[must_use]
pub fn is_attribute_key(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

/// All values stored under `key` anywhere in the tree, shallowest first.
///
/// Breadth-first, so a statute-level field wins over a same-named field
/// buried inside an amendment text.
#[must_use]
pub fn find_breadth_first<'a>(root: &'a GenericNode, key: &str) -> Vec<&'a GenericNode> {
    let mut found = Vec::new();
    let mut queue: VecDeque<(&GenericNode, usize)> = VecDeque::new();
    queue.push_back((root, 0));

    while let Some((node, depth)) = queue.pop_front() {
        if depth > MAX_DEPTH {
            continue;
        }
        match node {
            GenericNode::Text(_) => {}
            GenericNode::Sequence(items) => {
                queue.extend(items.iter().map(|item| (item, depth + 1)));
            }
            GenericNode::Mapping(entries) => {
                for (k, v) in entries {
                    if k == key {
                        found.extend(as_sequence(Some(v)));
                    } else if v.is_container() {
                        queue.push_back((v, depth + 1));
                    }
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_xml_leaf_becomes_text() {
        let tree = GenericNode::from_xml("<Law><LawNum>第一号</LawNum></Law>").unwrap();
        let law = tree.get("Law").unwrap();
        assert_eq!(law.get("LawNum"), Some(&GenericNode::Text("第一号".to_string())));
    }

    #[test]
    fn test_from_xml_attributes_are_prefixed() {
        let tree = GenericNode::from_xml(r#"<Article Num="3_2"><ArticleTitle>第三条の二</ArticleTitle></Article>"#)
            .unwrap();
        let article = tree.get("Article").unwrap();
        assert_eq!(article.attribute("Num"), Some("3_2"));
        assert!(article.has_key("@Num"));
        assert!(!article.has_key("Num"));
    }

    #[test]
    fn test_from_xml_leaf_with_attribute_keeps_text() {
        let tree = GenericNode::from_xml(r#"<LawTitle Kana="けんぽう">日本国憲法</LawTitle>"#).unwrap();
        let title = tree.get("LawTitle").unwrap();
        assert_eq!(title.attribute("Kana"), Some("けんぽう"));
        assert_eq!(deep_text(title, &[]), "日本国憲法");
    }

    #[test]
    fn test_from_xml_repeated_children_keep_order() {
        let xml = "<Body><Article>1</Article><Chapter>c</Chapter><Article>2</Article></Body>";
        let tree = GenericNode::from_xml(xml).unwrap();
        let body = tree.get("Body").unwrap();
        let keys: Vec<&str> = body.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Article", "Chapter", "Article"]);

        let articles: Vec<_> = body.get_all("Article").iter().filter_map(|n| n.as_text()).collect();
        assert_eq!(articles, vec!["1", "2"]);
    }

    #[test]
    fn test_from_xml_mixed_content() {
        let xml = "<Sentence>前<Ruby>漢字<Rt>かんじ</Rt></Ruby>後</Sentence>";
        let tree = GenericNode::from_xml(xml).unwrap();
        assert_eq!(deep_text(&tree, &[]), "前漢字後");
    }

    #[test]
    fn test_from_xml_malformed() {
        assert!(matches!(
            GenericNode::from_xml("<not-xml"),
            Err(StatuteError::XmlParse(_))
        ));
    }

    #[test]
    fn test_from_xml_too_deep() {
        let xml = format!("{}{}", "<a>".repeat(10), "</a>".repeat(10));
        assert!(matches!(
            GenericNode::from_xml_with_depth(&xml, 5),
            Err(StatuteError::TooDeep { depth: 5 })
        ));
        assert!(GenericNode::from_xml_with_depth(&xml, 20).is_ok());
    }

    #[test]
    fn test_from_json() {
        let tree = GenericNode::from_json_str(
            r#"{"Law": {"LawNum": "第一号", "Article": [{"Num": 1}, {"Num": 2}]}}"#,
        )
        .unwrap();
        let law = tree.get("Law").unwrap();
        assert_eq!(law.get_all("Article").len(), 2);
        assert_eq!(law.field_text(&["LawNum"]), Some("第一号".to_string()));
    }

    #[test]
    fn test_as_sequence() {
        let text = GenericNode::Text("a".to_string());
        let seq = GenericNode::Sequence(vec![text.clone(), text.clone()]);

        assert!(as_sequence(None).is_empty());
        assert_eq!(as_sequence(Some(&text)), vec![&text]);
        assert_eq!(as_sequence(Some(&seq)).len(), 2);
    }

    #[test]
    fn test_deep_text_skips_attributes_and_excluded() {
        let xml = r#"<Paragraph Num="2"><ParagraphNum>２</ParagraphNum><ParagraphSentence><Sentence>本文。</Sentence></ParagraphSentence></Paragraph>"#;
        let tree = GenericNode::from_xml(xml).unwrap();
        let paragraph = tree.get("Paragraph").unwrap();
        assert_eq!(deep_text(paragraph, &[]), "２本文。");
        assert_eq!(deep_text(paragraph, &["ParagraphNum"]), "本文。");
    }

    #[test]
    fn test_deep_text_bounded() {
        let mut node = GenericNode::Text("deep".to_string());
        for _ in 0..(MAX_DEPTH + 10) {
            node = GenericNode::Mapping(vec![("x".to_string(), node)]);
        }
        assert_eq!(deep_text(&node, &[]), "");
    }

    #[test]
    fn test_first_non_empty_text() {
        let blank = GenericNode::Text("  ".to_string());
        let value = GenericNode::Text(" 民法 ".to_string());
        let other = GenericNode::Text("商法".to_string());
        assert_eq!(
            first_non_empty_text([&blank, &value, &other]),
            Some("民法".to_string())
        );
        assert_eq!(first_non_empty_text([&blank]), None);
        assert_eq!(first_non_empty_text(Vec::<&GenericNode>::new()), None);
    }

    #[test]
    fn test_find_breadth_first_prefers_shallow() {
        let xml = "<Root><Deep><LawNum>深い</LawNum></Deep><LawNum>浅い</LawNum></Root>";
        let tree = GenericNode::from_xml(xml).unwrap();
        let found = find_breadth_first(&tree, "LawNum");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].as_text(), Some("浅い"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a \n\t b"), "a b");
        assert_eq!(normalize_whitespace("附\u{3000}則"), "附 則");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
