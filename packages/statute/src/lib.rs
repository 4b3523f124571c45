//! Roppo Statute - Normalize e-Gov statute XML into a renderable model.
//!
//! This crate turns the semi-structured XML published by the e-Gov law API
//! into a [`ParsedStatute`]: title, metadata and an ordered list of articles
//! with flattened paragraph text and supplementary-provision labels. It
//! performs no I/O; fetching documents is the harvester's concern.
//!
//! # Example
//!
//! ```
//! use roppo_statute::{parse, LabelStyle};
//!
//! let statute = parse(r#"<Law Era="Showa" Year="22" PromulgateMonth="5" PromulgateDay="3">
//!   <LawNum>昭和二十二年法律第一号</LawNum>
//!   <LawBody><LawTitle>見本法</LawTitle><MainProvision>
//!     <Article Num="3_2"><ArticleTitle>第三条の二</ArticleTitle>
//!       <Paragraph Num="1"><ParagraphSentence><Sentence>本文。</Sentence></ParagraphSentence></Paragraph>
//!       <Paragraph Num="2"><ParagraphNum>２</ParagraphNum><ParagraphSentence><Sentence>次項。</Sentence></ParagraphSentence></Paragraph>
//!     </Article>
//!   </MainProvision></LawBody>
//! </Law>"#);
//!
//! assert_eq!(statute.metadata.promulgation_date.as_deref(), Some("1947-05-03"));
//! let article = &statute.articles[0];
//! assert_eq!(article.key, "第3条の2");
//! let style = LabelStyle::default();
//! assert_eq!(article.paragraphs[0].label(&style), "");
//! assert_eq!(article.paragraphs[1].label(&style), "【第2項】");
//! ```
//!
//! # Architecture
//!
//! - [`tree`]: Generic document tree and shape-tolerant accessors
//! - [`collector`]: Depth-first article and paragraph collection
//! - [`numbering`]: Article, paragraph and supplementary label normalization
//! - [`era`]: Japanese era date conversion
//! - [`metadata`]: Title and statute metadata resolution
//! - [`parser`]: Entry points and key assignment
//! - [`model`]: Output types
//! - [`search`], [`glossary`], [`inspect`]: Consumers of the model and tree
//! - [`cache`]: Optional memoization keyed by input text

pub mod cache;
pub mod collector;
pub mod config;
pub mod era;
pub mod error;
pub mod glossary;
pub mod inspect;
pub mod metadata;
pub mod model;
pub mod numbering;
pub mod parser;
pub mod search;
pub mod tree;

pub use config::{FieldCandidates, LabelStyle, ParseConfig};
pub use error::{Result, StatuteError};
pub use model::{Article, Paragraph, ParsedStatute, StatuteMetadata};
pub use numbering::{normalize_article_number, paragraph_label};
pub use parser::{parse, parse_json, parse_tree, parse_with_config, try_parse, try_parse_with_config};
pub use tree::GenericNode;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
