//! Tree-shape summaries for debugging unfamiliar documents.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::MAX_DEPTH;
use crate::tree::{as_sequence, find_breadth_first, first_non_empty_text, is_attribute_key, GenericNode};

/// Default depth of [`ShapeSummary::main_keys_tree`].
pub const DEFAULT_KEY_TREE_DEPTH: usize = 3;

/// Cap on [`ShapeSummary::sample_article_paths`].
pub const MAX_SAMPLE_PATHS: usize = 20;

/// Raw `Article` element counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCounts {
    /// Articles directly under `MainProvision`.
    pub main_direct: usize,
    /// Articles anywhere under `MainProvision`.
    pub main_nested: usize,
    /// Articles anywhere under `SupplProvision` blocks.
    pub supplementary: usize,
}

/// Shape of a statute document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub has_preamble: bool,
    pub counts: ArticleCounts,
    /// Child keys of `LawBody`, in document order without repeats.
    pub body_keys: Vec<String>,
    /// Paths of containers holding articles, e.g. `MainProvision.Chapter[0].Article[x]`.
    pub sample_article_paths: Vec<String>,
    /// Key structure of `MainProvision`; repeated keys are suffixed `[]`.
    pub main_keys_tree: Value,
}

/// Summarize the shape of a parsed document tree.
#[must_use]
pub fn inspect_shape(tree: &GenericNode) -> ShapeSummary {
    let Some(body) = find_breadth_first(tree, "LawBody").into_iter().next() else {
        return ShapeSummary::default();
    };
    let main = body.get("MainProvision");

    let mut sample_article_paths = Vec::new();
    let main_nested = main.map_or(0, |m| {
        count_articles(m, "MainProvision", 0, &mut sample_article_paths)
    });
    let supplementary = body
        .get_all("SupplProvision")
        .into_iter()
        .map(|s| count_articles(s, "SupplProvision", 0, &mut Vec::new()))
        .sum();

    let mut body_keys: Vec<String> = Vec::new();
    for (key, _) in body.entries() {
        if !is_attribute_key(key) && !body_keys.contains(key) {
            body_keys.push(key.clone());
        }
    }

    ShapeSummary {
        title: first_non_empty_text(find_breadth_first(tree, "LawTitle")),
        has_preamble: body.has_key("Preamble"),
        counts: ArticleCounts {
            main_direct: main.map_or(0, |m| m.get_all("Article").len()),
            main_nested,
            supplementary,
        },
        body_keys,
        sample_article_paths,
        main_keys_tree: main.map_or(Value::Null, |m| key_tree(m, DEFAULT_KEY_TREE_DEPTH)),
    }
}

fn count_articles(node: &GenericNode, path: &str, depth: usize, paths: &mut Vec<String>) -> usize {
    if depth > MAX_DEPTH {
        return 0;
    }

    let articles = node.get_all("Article").len();
    if articles > 0 && paths.len() < MAX_SAMPLE_PATHS {
        paths.push(format!("{path}.Article[x]"));
    }

    let mut total = articles;
    let mut indexes: HashMap<&str, usize> = HashMap::new();
    for (key, value) in node.entries() {
        if key == "Article" || !value.is_container() {
            continue;
        }
        for child in as_sequence(Some(value)) {
            let index = indexes.entry(key.as_str()).or_insert(0);
            let child_path = format!("{path}.{key}[{index}]");
            *index += 1;
            total += count_articles(child, &child_path, depth + 1, paths);
        }
    }
    total
}

/// Key structure of a node down to `max_depth` levels.
///
/// Leaves show as `"text"`. Keys that repeat are listed once as `key[]`
/// with the shape of their first occurrence.
#[must_use]
pub fn key_tree(node: &GenericNode, max_depth: usize) -> Value {
    shape(node, 0, max_depth)
}

fn shape(node: &GenericNode, depth: usize, max_depth: usize) -> Value {
    match node {
        GenericNode::Text(_) => Value::String("text".to_string()),
        _ if depth >= max_depth => Value::Null,
        GenericNode::Sequence(items) => match items.first() {
            Some(first) => Value::Array(vec![shape(first, depth + 1, max_depth)]),
            None => Value::Array(Vec::new()),
        },
        GenericNode::Mapping(entries) => {
            let mut out = Map::new();
            for (key, value) in entries {
                let repeated = node.get_all(key).len() > 1;
                let name = if repeated { format!("{key}[]") } else { key.clone() };
                if !out.contains_key(&name) {
                    out.insert(name, shape(value, depth + 1, max_depth));
                }
            }
            Value::Object(out)
        }
    }
}
