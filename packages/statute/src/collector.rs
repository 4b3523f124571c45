//! Article and paragraph collection.
//!
//! The walk is pre-order and left-to-right over the whole tree, so articles
//! buried under any number of Part/Chapter/Section/Division layers come out
//! in document order. Every level returns a fresh `Vec` that the caller
//! concatenates.
//!
//! Articles can themselves contain articles: an amending law quotes the
//! provisions it inserts under `AmendProvision/NewProvision`. Those come out
//! right after the article that quotes them.
//!
//! Supplementary context is carried down as the group label of the nearest
//! enclosing supplementary block (`SupplProvision` in e-Gov documents).

use crate::config::{ParseConfig, SUPPL_BLOCK_MARKER};
use crate::era::normalize_date;
use crate::model::{Article, Paragraph, StatuteMetadata};
use crate::numbering::{
    extract_article_number, is_article_number_shaped, normalize_article_number,
    supplementary_label,
};
use crate::tree::{as_sequence, deep_text, is_attribute_key, normalize_whitespace, GenericNode};

const ARTICLE_KEY: &str = "Article";
const ARTICLE_TITLE_KEY: &str = "ArticleTitle";
const PARAGRAPH_KEY: &str = "Paragraph";
const PARAGRAPH_SENTENCE_KEY: &str = "ParagraphSentence";
const PARAGRAPH_CAPTION_KEY: &str = "ParagraphCaption";
const SENTENCE_KEY: &str = "Sentence";
const COLUMN_KEY: &str = "Column";
const ITEM_KEY: &str = "Item";
const AMEND_PROVISION_KEY: &str = "AmendProvision";
const AMEND_PROVISION_SENTENCE_KEY: &str = "AmendProvisionSentence";

/// Deepest `SubitemN` level in e-Gov documents.
const MAX_SUBITEM_LEVEL: usize = 10;

/// An article as collected, before key assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedArticle {
    pub number: Option<String>,
    pub title: Option<String>,
    pub paragraphs: Vec<Paragraph>,
    pub group_label: Option<String>,
}

impl CollectedArticle {
    /// Attach a key, producing the final [`Article`].
    #[must_use]
    pub fn into_article(self, key: String) -> Article {
        Article {
            key,
            number: self.number,
            title: self.title,
            paragraphs: self.paragraphs,
            group_label: self.group_label,
        }
    }
}

/// One item or sub-item, flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemText {
    title: Option<String>,
    text: String,
}

impl ItemText {
    fn joined(&self) -> String {
        match &self.title {
            Some(title) if !self.text.is_empty() => format!("{title} {}", self.text),
            Some(title) => title.clone(),
            None => self.text.clone(),
        }
    }
}

/// Depth-first article collector for one document.
pub struct Collector<'a> {
    config: &'a ParseConfig,
    metadata: &'a StatuteMetadata,
}

impl<'a> Collector<'a> {
    /// Create a collector.
    ///
    /// `metadata` supplies the fallback law number and date for
    /// supplementary labels.
    #[must_use]
    pub fn new(config: &'a ParseConfig, metadata: &'a StatuteMetadata) -> Self {
        Self { config, metadata }
    }

    /// Collect every article in the tree, in document order.
    #[must_use]
    pub fn collect(&self, root: &GenericNode) -> Vec<CollectedArticle> {
        self.walk(root, None, 0)
    }

    fn walk(&self, node: &GenericNode, group: Option<&str>, depth: usize) -> Vec<CollectedArticle> {
        if depth > self.config.max_depth {
            tracing::warn!(max_depth = self.config.max_depth, "Document nesting too deep, skipping subtree");
            return Vec::new();
        }

        match node {
            GenericNode::Text(_) => Vec::new(),
            GenericNode::Sequence(items) => items
                .iter()
                .flat_map(|item| self.walk(item, group, depth + 1))
                .collect(),
            GenericNode::Mapping(_) => self.walk_mapping(node, group, depth),
        }
    }

    fn walk_mapping(&self, node: &GenericNode, group: Option<&str>, depth: usize) -> Vec<CollectedArticle> {
        let mut collected = Vec::new();

        let bare = self.is_bare_article(node);
        if bare {
            tracing::debug!(group = ?group, "Treating container as a bare article");
            if let Some(article) = self.normalize_article(node, node, group) {
                collected.push(article);
            }
        }

        for (key, value) in node.entries() {
            if key == ARTICLE_KEY {
                for article in as_sequence(Some(value)) {
                    collected.extend(self.article_with_nested(article, node, group, depth + 1));
                }
                continue;
            }

            if is_attribute_key(key) || !value.is_container() || (bare && is_article_content_key(key)) {
                continue;
            }

            for child in as_sequence(Some(value)) {
                let child_group = self.child_group(key, child, group);
                collected.extend(self.walk(child, child_group.as_deref(), depth + 1));
            }
        }

        collected
    }

    /// An article followed by the articles quoted inside it.
    fn article_with_nested(
        &self,
        article: &GenericNode,
        parent: &GenericNode,
        group: Option<&str>,
        depth: usize,
    ) -> Vec<CollectedArticle> {
        let mut collected: Vec<CollectedArticle> =
            self.normalize_article(article, parent, group).into_iter().collect();
        collected.extend(self.nested_articles(article, group, depth));
        collected
    }

    /// Walk an article's subtree for `Article` entries only.
    ///
    /// Paragraphs inside an article look like bare articles, so the
    /// fallback detection of [`Self::walk_mapping`] does not apply here.
    fn nested_articles(&self, node: &GenericNode, group: Option<&str>, depth: usize) -> Vec<CollectedArticle> {
        if depth > self.config.max_depth {
            tracing::warn!(max_depth = self.config.max_depth, "Article nesting too deep, skipping subtree");
            return Vec::new();
        }

        if let GenericNode::Sequence(items) = node {
            return items
                .iter()
                .flat_map(|item| self.nested_articles(item, group, depth + 1))
                .collect();
        }

        let mut collected = Vec::new();
        for (key, value) in node.entries() {
            if key == ARTICLE_KEY {
                for article in as_sequence(Some(value)) {
                    tracing::debug!("Collecting article quoted inside another article");
                    collected.extend(self.article_with_nested(article, node, group, depth + 1));
                }
                continue;
            }

            if is_attribute_key(key) || !value.is_container() {
                continue;
            }

            for child in as_sequence(Some(value)) {
                let child_group = self.child_group(key, child, group);
                collected.extend(self.nested_articles(child, child_group.as_deref(), depth + 1));
            }
        }
        collected
    }

    /// A node with article content but no `Article` wrapper.
    fn is_bare_article(&self, node: &GenericNode) -> bool {
        if node.has_key(ARTICLE_KEY) {
            return false;
        }
        if node.has_key(PARAGRAPH_KEY) {
            return true;
        }
        let fields = &self.config.fields;
        let has_heading = fields
            .article_number
            .iter()
            .chain(&fields.article_caption)
            .any(|k| node.has_key(k));
        has_heading && (node.has_key(SENTENCE_KEY) || node.has_key(PARAGRAPH_SENTENCE_KEY))
    }

    fn child_group(&self, key: &str, child: &GenericNode, inherited: Option<&str>) -> Option<String> {
        if !key.to_lowercase().contains(SUPPL_BLOCK_MARKER) {
            return inherited.map(String::from);
        }

        let label = self
            .label_from_fields(child)
            .or_else(|| inherited.map(String::from))
            .unwrap_or_else(|| self.metadata_label());
        tracing::debug!(block = %key, label = %label, "Entering supplementary block");
        Some(label)
    }

    /// Label from a node's own amendment law number and date, if it has either.
    fn label_from_fields(&self, node: &GenericNode) -> Option<String> {
        let fields = &self.config.fields;
        let law_number = node
            .field_text(fields.suppl_law_number.as_slice())
            .map(|n| normalize_whitespace(&n));
        let date = node
            .field_text(fields.suppl_date.as_slice())
            .map(|d| normalize_date(&d).unwrap_or(d));

        if law_number.is_none() && date.is_none() {
            return None;
        }
        Some(supplementary_label(law_number.as_deref(), date.as_deref()))
    }

    fn metadata_label(&self) -> String {
        supplementary_label(
            self.metadata.law_number.as_deref(),
            self.metadata.promulgation_date.as_deref(),
        )
    }

    fn is_flagged_supplementary(&self, article: &GenericNode) -> bool {
        let fields = &self.config.fields;
        fields.suppl_flags.iter().any(|k| article.has_key(k))
            || article.field_text(fields.suppl_law_number.as_slice()).is_some()
    }

    fn normalize_article(
        &self,
        article: &GenericNode,
        parent: &GenericNode,
        group: Option<&str>,
    ) -> Option<CollectedArticle> {
        let fields = &self.config.fields;

        let caption = article
            .field_text(fields.article_caption.as_slice())
            .map(|c| normalize_whitespace(&c));
        let number = article
            .field_text(fields.article_number.as_slice())
            .map(|raw| normalize_article_number(&raw))
            .filter(|n| !n.is_empty())
            .or_else(|| caption.as_deref().and_then(extract_article_number));
        let title = caption
            .or_else(|| {
                article
                    .field_text(&[ARTICLE_TITLE_KEY])
                    .filter(|t| !is_article_number_shaped(t))
            })
            .filter(|t| number.as_deref() != Some(t.as_str()));

        let paragraphs = self.article_paragraphs(article);

        if number.is_none() && paragraphs.is_empty() {
            tracing::debug!("Dropping article with neither number nor text");
            return None;
        }

        let group_label = match group {
            Some(label) => Some(label.to_string()),
            None if self.is_flagged_supplementary(article) => Some(
                self.label_from_fields(article)
                    .or_else(|| self.label_from_fields(parent))
                    .unwrap_or_else(|| self.metadata_label()),
            ),
            None => None,
        };

        Some(CollectedArticle {
            number,
            title,
            paragraphs,
            group_label,
        })
    }

    fn article_paragraphs(&self, article: &GenericNode) -> Vec<Paragraph> {
        let paragraph_nodes = article.get_all(PARAGRAPH_KEY);

        if paragraph_nodes.is_empty() {
            let fields = &self.config.fields;
            let exclude: Vec<&str> = fields
                .article_number
                .iter()
                .chain(&fields.article_caption)
                .chain(&fields.suppl_law_number)
                .chain(&fields.suppl_date)
                .chain(&fields.suppl_flags)
                .map(String::as_str)
                .chain([ARTICLE_TITLE_KEY])
                .collect();
            let text = normalize_whitespace(&deep_text(article, &exclude));
            return if text.is_empty() {
                Vec::new()
            } else {
                vec![Paragraph::new(None, text)]
            };
        }

        paragraph_nodes
            .into_iter()
            .flat_map(|p| self.paragraph_entries(p))
            .collect()
    }

    /// One paragraph node becomes one entry, or one entry per item when it
    /// has no text of its own.
    fn paragraph_entries(&self, paragraph: &GenericNode) -> Vec<Paragraph> {
        let number = paragraph
            .field_text(self.config.fields.paragraph_number.as_slice())
            .map(|n| n.trim().to_string());
        let amendments: Vec<String> = paragraph
            .get_all(AMEND_PROVISION_KEY)
            .into_iter()
            .map(|a| join_sentences(a.get_all(AMEND_PROVISION_SENTENCE_KEY)))
            .collect();
        let direct = std::iter::once(self.paragraph_text(paragraph))
            .chain(amendments)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let items: Vec<ItemText> = paragraph
            .get_all(ITEM_KEY)
            .into_iter()
            .flat_map(|item| flatten_item(item, ITEM_KEY, 0))
            .collect();

        if !direct.is_empty() {
            let text = std::iter::once(direct)
                .chain(items.iter().map(ItemText::joined))
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            return vec![Paragraph::new(number, text)];
        }

        items
            .into_iter()
            .filter(|item| !item.text.is_empty())
            .map(|item| Paragraph::new(item.title, item.text))
            .collect()
    }

    fn paragraph_text(&self, paragraph: &GenericNode) -> String {
        let candidates = [
            join_sentences(paragraph.get_all(PARAGRAPH_SENTENCE_KEY)),
            join_sentences(paragraph.get_all(SENTENCE_KEY)),
        ];
        if let Some(text) = candidates.into_iter().find(|t| !t.is_empty()) {
            return text;
        }

        let exclude: Vec<&str> = self
            .config
            .fields
            .paragraph_number
            .iter()
            .map(String::as_str)
            .chain([ITEM_KEY, PARAGRAPH_CAPTION_KEY, AMEND_PROVISION_KEY])
            .collect();
        normalize_whitespace(&deep_text(paragraph, &exclude))
    }
}

fn is_article_content_key(key: &str) -> bool {
    [PARAGRAPH_KEY, PARAGRAPH_SENTENCE_KEY, SENTENCE_KEY].contains(&key)
}

/// Flattened text of sentence containers, with `Column` runs space-separated.
fn join_sentences(nodes: Vec<&GenericNode>) -> String {
    let parts: Vec<String> = nodes.into_iter().map(sentence_text).collect();
    normalize_whitespace(&parts.join(" "))
}

fn sentence_text(node: &GenericNode) -> String {
    let columns = node.get_all(COLUMN_KEY);
    if columns.is_empty() {
        return deep_text(node, &[]);
    }
    columns
        .into_iter()
        .map(|c| normalize_whitespace(&deep_text(c, &[])))
        .collect::<Vec<_>>()
        .join(" ")
}

/// An item and its sub-items in document order.
///
/// `Item` children are `Subitem1`, whose children are `Subitem2`, and so on;
/// each level names its parts `{tag}Title` and `{tag}Sentence`.
fn flatten_item(node: &GenericNode, tag: &str, level: usize) -> Vec<ItemText> {
    if level >= MAX_SUBITEM_LEVEL {
        return Vec::new();
    }

    let title_key = format!("{tag}Title");
    let sentence_key = format!("{tag}Sentence");
    let child_tag = format!("Subitem{}", level + 1);

    let title = node
        .get(&title_key)
        .map(|t| normalize_whitespace(&deep_text(t, &[])))
        .filter(|t| !t.is_empty());
    let mut text = join_sentences(node.get_all(&sentence_key));
    if text.is_empty() && node.get(&sentence_key).is_none() {
        text = normalize_whitespace(&deep_text(node, &[title_key.as_str(), child_tag.as_str()]));
    }

    let mut out = vec![ItemText { title, text }];
    for child in node.get_all(&child_tag) {
        out.extend(flatten_item(child, &child_tag, level + 1));
    }
    out
}
