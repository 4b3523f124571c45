//! In-statute search and match highlighting.

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::model::{Article, ParsedStatute};

/// A run of text, either outside or inside a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Plain(String),
    Match(String),
}

impl Segment {
    /// Text of this run.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Match(text) => text,
        }
    }

    /// Check whether this run is a match.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

/// Articles whose number, title or paragraph text contains `query`.
///
/// Document order is kept. A blank query keeps every article.
///
/// # Examples
/// ```
/// use roppo_statute::{parse, search::filter_articles};
///
/// let statute = parse(r#"<Law>
///   <Article Num="1"><Sentence>国民の権利</Sentence></Article>
///   <Article Num="2"><Sentence>国の義務</Sentence></Article>
/// </Law>"#);
/// let hits = filter_articles(&statute, "権利");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].key, "第1条");
/// ```
#[must_use]
pub fn filter_articles<'a>(statute: &'a ParsedStatute, query: &str) -> Vec<&'a Article> {
    let query = query.trim();
    if query.is_empty() {
        return statute.articles.iter().collect();
    }

    let Some(pattern) = query_pattern(query) else {
        return Vec::new();
    };

    statute
        .articles
        .iter()
        .filter(|article| article_matches(article, &pattern))
        .collect()
}

fn article_matches(article: &Article, pattern: &Regex) -> bool {
    article.number.iter().chain(&article.title).any(|s| pattern.is_match(s))
        || article.paragraphs.iter().any(|p| pattern.is_match(&p.text))
}

/// Split `text` into plain and matching runs for `query`.
///
/// Matching ignores ASCII case. A blank query gives a single plain run.
///
/// # Examples
/// ```
/// use roppo_statute::search::{highlight, Segment};
///
/// assert_eq!(
///     highlight("法律とは法律である", "法律"),
///     vec![
///         Segment::Match("法律".into()),
///         Segment::Plain("とは".into()),
///         Segment::Match("法律".into()),
///         Segment::Plain("である".into()),
///     ]
/// );
/// ```
#[must_use]
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }
    let pattern = match query_pattern(query.trim()) {
        Some(pattern) if !query.trim().is_empty() => pattern,
        _ => return vec![Segment::Plain(text.to_string())],
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Plain(text[last..m.start()].to_string()));
        }
        segments.push(Segment::Match(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() {
        segments.push(Segment::Plain(text[last..].to_string()));
    }
    segments
}

/// Number of matches of `query` across the whole statute.
#[must_use]
pub fn count_matches(statute: &ParsedStatute, query: &str) -> usize {
    let query = query.trim();
    let Some(pattern) = query_pattern(query).filter(|_| !query.is_empty()) else {
        return 0;
    };
    statute
        .articles
        .iter()
        .flat_map(|a| &a.paragraphs)
        .map(|p| pattern.find_iter(&p.text).count())
        .sum()
}

fn query_pattern(query: &str) -> Option<Regex> {
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            tracing::warn!(error = %err, query = %query, "Could not build search pattern");
            None
        }
    }
}
