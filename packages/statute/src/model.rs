//! Normalized statute model.
//!
//! These types are the output contract consumed by renderers, search and
//! glossary extraction. They are built once per parse call and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::config::LabelStyle;
use crate::numbering::paragraph_label;

/// Statute-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatuteMetadata {
    /// Law number (e.g. "昭和二十二年法律第六十七号").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_number: Option<String>,

    /// Promulgation date, ISO `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promulgation_date: Option<String>,

    /// Enforcement date, ISO `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforcement_date: Option<String>,
}

/// A paragraph (項) or an item (号) promoted to paragraph level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Raw ordinal as found in the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Flattened, whitespace-normalized text.
    pub text: String,
}

impl Paragraph {
    /// Create a new paragraph.
    #[must_use]
    pub fn new(number: Option<String>, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Display label for this paragraph's number; empty for paragraph 1.
    #[must_use]
    pub fn label(&self, style: &LabelStyle) -> String {
        paragraph_label(self.number.as_deref(), style)
    }
}

/// An article (条).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Unique key within one statute.
    pub key: String,

    /// Display number, e.g. "第3条の2".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Caption, when distinct from the number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub paragraphs: Vec<Paragraph>,

    /// Supplementary-provision group label, e.g. "附則（… 改正）".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
}

impl Article {
    /// Heading to display: number, then title, then key.
    #[must_use]
    pub fn heading(&self) -> &str {
        self.number
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(&self.key)
    }

    /// Check whether the article belongs to a supplementary provision.
    #[must_use]
    pub fn is_supplementary(&self) -> bool {
        self.group_label.is_some()
    }

    /// All paragraph text joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of parsing one statute document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStatute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub metadata: StatuteMetadata,

    /// Articles in source document order.
    pub articles: Vec<Article>,
}

impl ParsedStatute {
    /// Look up an article by key.
    #[must_use]
    pub fn article(&self, key: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.key == key)
    }

    /// Check whether nothing at all was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.articles.is_empty() && self.metadata == StatuteMetadata::default()
    }

    /// Consecutive runs of articles sharing a group label.
    ///
    /// Main-provision runs have `None` as their label.
    #[must_use]
    pub fn groups(&self) -> Vec<(Option<&str>, &[Article])> {
        let mut groups: Vec<(Option<&str>, &[Article])> = Vec::new();
        let mut start = 0;

        for i in 1..=self.articles.len() {
            let boundary = i == self.articles.len()
                || self.articles[i].group_label != self.articles[start].group_label;
            if boundary {
                groups.push((
                    self.articles[start].group_label.as_deref(),
                    &self.articles[start..i],
                ));
                start = i;
            }
        }

        groups
    }
}
