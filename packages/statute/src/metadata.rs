//! Statute-level title and metadata resolution.
//!
//! Each field is resolved from an ordered list of candidate names (see
//! [`FieldCandidates`]). Every candidate is searched breadth-first through
//! the whole tree, so both `DataRoot/ApplData/LawFullText/Law/LawBody` and
//! flattened renditions resolve the same way.

use crate::config::FieldCandidates;
use crate::era::{era_to_iso, normalize_date};
use crate::model::StatuteMetadata;
use crate::tree::{find_breadth_first, first_non_empty_text, normalize_whitespace, GenericNode};

/// Resolve the statute title.
///
/// # Examples
/// ```
/// use roppo_statute::config::FieldCandidates;
/// use roppo_statute::metadata::resolve_title;
/// use roppo_statute::tree::GenericNode;
///
/// let tree = GenericNode::from_xml("<Law><LawBody><LawTitle>民法</LawTitle></LawBody></Law>").unwrap();
/// assert_eq!(resolve_title(&tree, &FieldCandidates::default()), Some("民法".to_string()));
/// ```
#[must_use]
pub fn resolve_title(root: &GenericNode, fields: &FieldCandidates) -> Option<String> {
    resolve_field(root, &fields.title).map(|t| normalize_whitespace(&t))
}

/// Resolve law number, promulgation date and enforcement date.
#[must_use]
pub fn extract_metadata(root: &GenericNode, fields: &FieldCandidates) -> StatuteMetadata {
    let law_number = resolve_field(root, &fields.law_number).map(|n| normalize_whitespace(&n));

    let promulgation_date = resolve_field(root, &fields.promulgation_date)
        .and_then(|raw| normalize_date(&raw))
        .or_else(|| {
            find_breadth_first(root, &fields.law_element)
                .into_iter()
                .find_map(era_attribute_date)
        });

    let enforcement_date =
        resolve_field(root, &fields.enforcement_date).and_then(|raw| normalize_date(&raw));

    if promulgation_date.is_none() {
        tracing::debug!("No promulgation date resolved");
    }

    StatuteMetadata {
        law_number,
        promulgation_date,
        enforcement_date,
    }
}

/// Date encoded as `Era`/`Year`/`PromulgateMonth`/`PromulgateDay` attributes.
///
/// This is how e-Gov marks the promulgation date on `<Law>` elements.
#[must_use]
pub fn era_attribute_date(node: &GenericNode) -> Option<String> {
    era_to_iso(
        node.attribute("Era")?,
        node.attribute("Year")?,
        node.attribute("PromulgateMonth")?,
        node.attribute("PromulgateDay")?,
    )
}

fn resolve_field(root: &GenericNode, candidates: &[String]) -> Option<String> {
    first_non_empty_text(
        candidates
            .iter()
            .flat_map(|key| find_breadth_first(root, key)),
    )
}
