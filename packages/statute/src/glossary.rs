//! Definition glossary extraction.
//!
//! Japanese statutes define terms with the fixed phrase
//! `「X」とは、Yをいう。`. Only main-provision articles are scanned.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::ParsedStatute;

/// Default cap on definitions taken from a single article.
pub const DEFAULT_MAX_PER_ARTICLE: usize = 10;

/// Cap on the number of glossary entries.
pub const MAX_ENTRIES: usize = 200;

/// Longest accepted term, in characters.
pub const MAX_TERM_CHARS: usize = 20;

/// Longest accepted definition, in characters.
pub const MAX_DEFINITION_CHARS: usize = 120;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([一-龯々〆ヶぁ-ゖァ-ヿA-Za-z0-9・ー「」『』()（）［］【】\-.]+?)とは、(.+?)をいう。")
        .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TERM_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[「『（(]+|[）」』)]+$").expect("valid regex"));

/// A defined term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
    /// Key of the defining article.
    pub article_key: String,
}

/// Extract defined terms from a statute.
///
/// Each term appears once, with its first definition in document order.
///
/// # Examples
/// ```
/// use roppo_statute::{glossary::extract_glossary, parse};
///
/// let statute = parse(r#"<Law><Article Num="2"><Paragraph Num="1"><ParagraphSentence>
///   <Sentence>この法律において「法令」とは、法律及び命令をいう。</Sentence>
/// </ParagraphSentence></Paragraph></Article></Law>"#);
///
/// let glossary = extract_glossary(&statute, 10);
/// assert_eq!(glossary[0].term, "法令");
/// assert_eq!(glossary[0].definition, "法律及び命令");
/// ```
#[must_use]
pub fn extract_glossary(statute: &ParsedStatute, max_per_article: usize) -> Vec<GlossaryEntry> {
    let mut entries = Vec::new();
    let mut terms: HashSet<String> = HashSet::new();

    for article in statute.articles.iter().filter(|a| !a.is_supplementary()) {
        let mut taken = 0;

        'paragraphs: for paragraph in &article.paragraphs {
            for caps in DEFINITION.captures_iter(&paragraph.text) {
                if taken >= max_per_article {
                    break 'paragraphs;
                }

                // "この法律において「法令」" defines 法令, not the whole run.
                let raw = caps[1].trim();
                let raw = raw.rfind('「').map_or(raw, |i| &raw[i..]);
                let term = TERM_QUOTES.replace_all(raw, "").to_string();
                let definition = caps[2].trim().trim_end_matches('。').to_string();
                if term.is_empty()
                    || term.chars().count() > MAX_TERM_CHARS
                    || definition.chars().count() > MAX_DEFINITION_CHARS
                {
                    continue;
                }

                taken += 1;
                if !terms.insert(term.clone()) {
                    continue;
                }
                entries.push(GlossaryEntry {
                    term,
                    definition,
                    article_key: article.key.clone(),
                });
                if entries.len() >= MAX_ENTRIES {
                    return entries;
                }
            }
        }
    }

    tracing::debug!(entries = entries.len(), "Extracted glossary");
    entries
}
