//! Configuration constants and parse settings.
//!
//! Field-name precedence for metadata differs between historical e-Gov
//! renditions, so the candidate lists live here as data rather than being
//! hard-coded in the extractors.

/// Maximum tree depth visited by any recursive walk.
pub const MAX_DEPTH: usize = 64;

/// Prefix marking attribute keys in a [`crate::tree::GenericNode::Mapping`].
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key used for text runs in mixed-content elements.
pub const TEXT_KEY: &str = "#text";

/// Ruby gloss elements dropped from flattened text.
pub const RUBY_GLOSS_KEYS: &[&str] = &["Rt"];

/// Default label for paragraphs numbered 2 and up. `{n}` is replaced.
pub const DEFAULT_PARAGRAPH_TEMPLATE: &str = "【第{n}項】";

/// Default label for kanji-numbered items. `{n}` is replaced.
pub const DEFAULT_ITEM_TEMPLATE: &str = "（{n}）";

/// Bare supplementary-provision label.
pub const SUPPL_LABEL: &str = "附則";

/// Case-insensitive marker identifying supplementary-provision containers.
pub const SUPPL_BLOCK_MARKER: &str = "suppl";

/// Ordered candidate field names for each piece of statute-level data.
///
/// Earlier entries win when several are populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidates {
    /// Statute title.
    pub title: Vec<String>,
    /// Law number (e.g. "昭和二十二年法律第六十七号").
    pub law_number: Vec<String>,
    /// Promulgation date in ISO or era text form.
    pub promulgation_date: Vec<String>,
    /// Enforcement date in ISO or era text form.
    pub enforcement_date: Vec<String>,
    /// Element carrying the era attribute quadruple.
    pub law_element: String,
    /// Article number sources, tried in order.
    pub article_number: Vec<String>,
    /// Article caption sources, tried in order.
    pub article_caption: Vec<String>,
    /// Paragraph number sources, tried in order.
    pub paragraph_number: Vec<String>,
    /// Law number fields on a supplementary block.
    pub suppl_law_number: Vec<String>,
    /// Date fields on a supplementary block.
    pub suppl_date: Vec<String>,
    /// Fields marking a single article as supplementary outside any block.
    pub suppl_flags: Vec<String>,
}

impl Default for FieldCandidates {
    fn default() -> Self {
        Self {
            title: strings(&["LawTitle", "LawName"]),
            law_number: strings(&["LawNum", "LawNo"]),
            promulgation_date: strings(&["PromulgationDate", "PromulgateDate"]),
            enforcement_date: strings(&["EnforcementDate", "EnforceDate"]),
            law_element: "Law".to_string(),
            article_number: strings(&["@Num", "ArticleNum", "Num", "ArticleTitle"]),
            article_caption: strings(&["ArticleCaption", "Caption"]),
            paragraph_number: strings(&["@Num", "ParagraphNum", "ParaNum", "Num"]),
            suppl_law_number: strings(&["@AmendLawNum", "SupplLawNum", "AmendLawNum"]),
            suppl_date: strings(&["@AmendLawDate", "SupplDate", "AmendLawDate"]),
            suppl_flags: strings(&["@Suppl", "@SupplProvision", "SupplProvisionLabel"]),
        }
    }
}

/// Display templates for paragraph and item numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelStyle {
    /// Template for paragraph ordinals >= 2.
    pub paragraph: String,
    /// Template for kanji item markers.
    pub item: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            paragraph: DEFAULT_PARAGRAPH_TEMPLATE.to_string(),
            item: DEFAULT_ITEM_TEMPLATE.to_string(),
        }
    }
}

/// Settings for one parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Candidate field names for titles, numbers, dates and supplementary flags.
    pub fields: FieldCandidates,
    /// Paragraph and item label templates.
    pub labels: LabelStyle,
    /// Deepest tree level the collector descends to.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            fields: FieldCandidates::default(),
            labels: LabelStyle::default(),
            max_depth: MAX_DEPTH,
        }
    }
}

impl ParseConfig {
    /// Override the recursion bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Override the label templates.
    #[must_use]
    pub fn with_labels(mut self, labels: LabelStyle) -> Self {
        self.labels = labels;
        self
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}
