//! Command-line interface for the harvester.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use roppo_statute::glossary::{extract_glossary, DEFAULT_MAX_PER_ARTICLE};
use roppo_statute::inspect::inspect_shape;
use roppo_statute::search::{filter_articles, highlight};
use roppo_statute::{GenericNode, LabelStyle};

use crate::config::{
    validate_law_id, DEFAULT_MAX_RESPONSE_SIZE, EGOV_API_URL, TEXT_WRAP_WIDTH,
};
use crate::error::{HarvesterError, Result};
use crate::harvester::{
    download_statute_from, load_statute_file, normalize_input, read_statute_xml,
};
use crate::output::{format_article, render, save_statute, OutputFormat};

/// Roppo Harvester - Download and normalize Japanese statutes from e-Gov.
#[derive(Parser)]
#[command(name = "roppo-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a statute by e-Gov law ID and save it as JSON or YAML.
    Download {
        /// e-Gov law ID (e.g., 322AC0000000067)
        law_id: String,

        /// Output directory (default: statutes/)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Maximum response size in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_RESPONSE_SIZE)]
        max_size: u64,

        /// e-Gov API base URL
        #[arg(long, default_value = EGOV_API_URL, hide = true)]
        base_url: String,
    },

    /// Parse a local statute XML file and print the result.
    Parse {
        /// Path to the statute XML
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Summarize the element structure of a statute XML file.
    Inspect {
        /// Path to the statute XML
        file: PathBuf,
    },

    /// Print the articles that contain a query.
    Search {
        /// Path to the statute XML
        file: PathBuf,

        /// Text to look for (case-insensitive)
        query: String,
    },

    /// List defined terms (「…」とは、…をいう。).
    Glossary {
        /// Path to the statute XML
        file: PathBuf,

        /// Maximum definitions taken from one article
        #[arg(long, default_value_t = DEFAULT_MAX_PER_ARTICLE)]
        max_per_article: usize,

        /// Print as JSON or YAML instead of a list
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            law_id,
            output,
            format,
            max_size,
            base_url,
        } => download_command(&law_id, output.as_deref(), format, max_size, &base_url),
        Commands::Parse { file, format } => parse_command(&file, format),
        Commands::Inspect { file } => inspect_command(&file),
        Commands::Search { file, query } => search_command(&file, &query),
        Commands::Glossary {
            file,
            max_per_article,
            format,
        } => glossary_command(&file, max_per_article, format),
    }
}

/// Execute the download command.
fn download_command(
    law_id: &str,
    output: Option<&Path>,
    format: OutputFormat,
    max_size: u64,
    base_url: &str,
) -> Result<()> {
    // Validate inputs before making HTTP requests
    validate_law_id(law_id)?;
    if let Some(output_dir) = output {
        validate_output_dir(output_dir)?;
    }

    println!("{} {}", style("Downloading").bold(), style(law_id).cyan());
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Downloading statute XML...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let harvested = match download_statute_from(base_url, law_id, max_size) {
        Ok(harvested) => harvested,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    let statute = &harvested.statute;
    pb.set_message("Processing articles...");

    println!(
        "  Title: {}",
        style(statute.title.as_deref().unwrap_or("(untitled)")).green()
    );
    if let Some(law_number) = &statute.metadata.law_number {
        println!("  Law number: {law_number}");
    }
    println!("  Articles: {}", statute.articles.len());
    if statute.is_empty() {
        println!("  {}", style("No articles found").yellow().bold());
    }

    pb.set_message("Saving...");
    let output_path = match save_statute(&harvested, format, output) {
        Ok(path) => path,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output_path.display()
    );

    Ok(())
}

fn validate_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Output directory does not exist: {}", output_dir.display()),
        )));
    }
    if !output_dir.is_dir() {
        return Err(HarvesterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(())
}

/// Execute the parse command.
fn parse_command(file: &Path, format: OutputFormat) -> Result<()> {
    let statute = load_statute_file(file)?;
    print!("{}", render(&statute, format)?);
    Ok(())
}

/// Execute the inspect command.
fn inspect_command(file: &Path) -> Result<()> {
    let tree = GenericNode::from_xml(&read_statute_xml(file)?)?;
    print!("{}", render(&inspect_shape(&tree), OutputFormat::Json)?);
    Ok(())
}

/// Execute the search command.
fn search_command(file: &Path, query: &str) -> Result<()> {
    let statute = load_statute_file(file)?;
    let query = normalize_input(query);
    let hits = filter_articles(&statute, &query);
    let labels = LabelStyle::default();

    for article in &hits {
        let text = format_article(article, &labels, TEXT_WRAP_WIDTH);
        let rendered: String = highlight(&text, &query)
            .iter()
            .map(|segment| {
                if segment.is_match() {
                    style(segment.text()).yellow().bold().to_string()
                } else {
                    segment.text().to_string()
                }
            })
            .collect();
        println!("{rendered}");
        println!();
    }

    println!(
        "{} {} of {} articles",
        style("Matched").bold(),
        style(hits.len()).cyan(),
        statute.articles.len()
    );
    Ok(())
}

/// Execute the glossary command.
fn glossary_command(
    file: &Path,
    max_per_article: usize,
    format: Option<OutputFormat>,
) -> Result<()> {
    let statute = load_statute_file(file)?;
    let entries = extract_glossary(&statute, max_per_article);

    if let Some(format) = format {
        print!("{}", render(&entries, format)?);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{} {} {}",
            style(&entry.term).bold(),
            entry.definition,
            style(format!("({})", entry.article_key)).dim()
        );
    }
    Ok(())
}
