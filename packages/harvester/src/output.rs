//! Output rendering for parsed statutes: JSON and YAML files, terminal text.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use roppo_statute::{Article, LabelStyle};
use serde::Serialize;
use textwrap::{fill, Options};

use crate::config::DEFAULT_OUTPUT_DIR;
use crate::error::Result;
use crate::harvester::HarvestedStatute;

/// Serialization format for saved and printed documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Render any serializable value in `format`, newline-terminated.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
        OutputFormat::Yaml => {
            let yaml = indent_yaml_sequences(&serde_yaml_ng::to_string(value)?);
            let lines: Vec<&str> = yaml.lines().map(str::trim_end).collect();
            Ok(format!("---\n{}\n", lines.join("\n")))
        }
    }
}

/// Indent YAML sequence items under their parent key.
///
/// serde_yaml_ng emits `- ` at the same column as the key that owns the
/// sequence; yamllint's `indent-sequences: true` wants two more spaces.
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    // Columns at which currently open sequences start
    let mut open: Vec<usize> = Vec::new();

    for line in yaml.lines() {
        let content = line.trim_start();
        if content.is_empty() {
            out.push(line.to_string());
            continue;
        }

        let column = line.len() - content.len();
        let is_item = content.starts_with("- ");

        while let Some(&start) = open.last() {
            if column < start || (column == start && !is_item) {
                open.pop();
            } else {
                break;
            }
        }
        if is_item && open.last() != Some(&column) {
            open.push(column);
        }

        let shift = open.len() * 2;
        out.push(format!("{}{content}", " ".repeat(column + shift)));
    }

    out.join("\n")
}

/// Save a harvested statute under `output_dir` as `{law_id}.{ext}`.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
///
/// # Returns
/// Path to the saved file
pub fn save_statute(
    harvested: &HarvestedStatute,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let output_dir = output_dir.unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));
    fs::create_dir_all(output_dir)?;

    let ext = format.extension();
    let output_file = output_dir.join(format!("{}.{ext}", harvested.law_id));
    let temp_file = output_dir.join(format!(".{}.{ext}.tmp", harvested.law_id));

    let content = render(harvested, format)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;
    tracing::debug!(path = %output_file.display(), "Saved statute");

    Ok(output_file)
}

/// Format an article for the terminal: a heading line, then one wrapped
/// block per paragraph prefixed with its label.
pub fn format_article(article: &Article, style: &LabelStyle, width: usize) -> String {
    let mut heading = article.heading().to_string();
    if let (Some(_), Some(title)) = (&article.number, &article.title) {
        heading.push_str(title);
    }
    if let Some(group) = &article.group_label {
        heading = format!("{group} {heading}");
    }

    let options = Options::new(width)
        .initial_indent("  ")
        .subsequent_indent("    ");
    let mut lines = vec![heading];
    for paragraph in &article.paragraphs {
        let text = format!("{}{}", paragraph.label(style), paragraph.text);
        lines.push(fill(&text, &options));
    }
    lines.join("\n")
}
