//! Command-line interface for quote-align.
//!
//! Provides commands for creating a tagged document from coreference
//! output, updating span offsets after manual annotation, and evaluating
//! quote attribution against gold annotations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config;
use crate::core::{build_document, update_document};
use crate::eval::{evaluate, render_json, render_text, GoldStandard, SystemOutput};
use crate::tables::{
    active_mentions, read_tsv, speaker_labels, ClusterRow, MentionRow, QuoteRow, TokenTable,
};

/// quote-align - Quote and speaker-mention alignment for annotated novels
#[derive(Parser, Debug)]
#[command(name = "quote-align")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a tagged document from a token table and coreference output
    Create {
        /// Token table (BookNLP format)
        #[arg(short, long)]
        booknlp: PathBuf,

        /// Mentions table (id, start, end, cluster)
        #[arg(short, long)]
        mentions: PathBuf,

        /// Quotes table (start, text, speakermention, speakercluster)
        #[arg(short, long)]
        quotes: PathBuf,

        /// Clusters table (id, label, mentions)
        #[arg(short, long)]
        clusters: PathBuf,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recompute quote and mention offsets of an annotated document
    Update {
        /// Annotated document
        #[arg(short = 'x', long)]
        xml: PathBuf,

        /// Token table the document was created from
        #[arg(short, long)]
        booknlp: PathBuf,

        /// Output path (defaults to <stem>_updated.xml beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score quote attribution against gold annotations
    Evaluate {
        /// Gold document produced by `update`
        gold: PathBuf,

        /// Prefix of the system's .quotes.tsv and .mentions.tsv
        output_prefix: String,

        /// Prefix of the gold .mentions.tsv and .clusters.tsv
        gold_prefix: String,

        /// Print the scores as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Create {
                booknlp,
                mentions,
                quotes,
                clusters,
                output,
            } => create(&booknlp, &mentions, &quotes, &clusters, output.as_deref()),
            Commands::Update {
                xml,
                booknlp,
                output,
            } => update(&xml, &booknlp, output),
            Commands::Evaluate {
                gold,
                output_prefix,
                gold_prefix,
                json,
            } => evaluate_quotes(&gold, &output_prefix, &gold_prefix, json),
            Commands::Config => show_config(),
        }
    }
}

fn load_token_table(path: &Path) -> Result<TokenTable> {
    let cfg = config::config()?;
    TokenTable::from_path(path, &cfg.columns, &cfg.comment_prefix)
        .with_context(|| format!("Failed to read token table: {}", path.display()))
}

fn load_table<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_tsv(path).with_context(|| format!("Failed to read table: {}", path.display()))
}

/// Build the tagged document
fn create(
    booknlp: &Path,
    mentions: &Path,
    quotes: &Path,
    clusters: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let table = load_token_table(booknlp)?;
    let quote_rows: Vec<QuoteRow> = load_table(quotes)?;
    let mention_rows: Vec<MentionRow> = load_table(mentions)?;
    let cluster_rows: Vec<ClusterRow> = load_table(clusters)?;

    let labels = speaker_labels(&quote_rows, &cluster_rows)
        .context("Failed to resolve quote speakers")?;
    let active = active_mentions(&quote_rows, &mention_rows)
        .context("Failed to resolve speaker mentions")?;

    let document = build_document(&table, &labels, &active);
    info!(
        tokens = table.token_count(),
        characters = labels.len(),
        mentions = active.len(),
        "Created tagged document"
    );

    match output {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("Failed to write document: {}", path.display()))?,
        None => print!("{}", document),
    }

    Ok(())
}

/// Rewrite span offsets after annotation
fn update(xml: &Path, booknlp: &Path, output: Option<PathBuf>) -> Result<()> {
    let content = std::fs::read_to_string(xml)
        .with_context(|| format!("Failed to read document: {}", xml.display()))?;
    let table = load_token_table(booknlp)?;

    let outcome = update_document(&content, &table)
        .with_context(|| format!("Failed to update document: {}", xml.display()))?;

    if outcome.malformed > 0 {
        warn!(
            count = outcome.malformed,
            "Skipped malformed quote or mention tags"
        );
    }

    let output = match output {
        Some(path) => path,
        None => config::config()?.updated_path(xml),
    };
    outcome
        .document
        .write_to(&output)
        .with_context(|| format!("Failed to write document: {}", output.display()))?;

    info!(
        path = %output.display(),
        quotes = outcome.quotes,
        mentions = outcome.mentions,
        "Updated document written"
    );
    Ok(())
}

/// Print mention- and cluster-level scores
fn evaluate_quotes(gold: &Path, output_prefix: &str, gold_prefix: &str, json: bool) -> Result<()> {
    let cfg = config::config()?;

    let gold = GoldStandard::load(gold, gold_prefix)
        .with_context(|| format!("Failed to load gold data: {}", gold.display()))?;
    let system = SystemOutput::load(output_prefix)
        .with_context(|| format!("Failed to load system output: {}", output_prefix))?;

    let evaluation = evaluate(&gold, &system, cfg.verbose)?;

    if json {
        println!("{}", render_json(&evaluation)?);
    } else {
        print!("{}", render_text(&evaluation));
    }

    Ok(())
}

fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("quote-align configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Token table columns:");
    println!("  Sentence id: {}", cfg.columns.sentence_id);
    println!("  Token:       {}", cfg.columns.token);
    println!("  Speaker:     {}", cfg.columns.speaker);
    println!("  Quote IOB:   {}", cfg.columns.quote);
    println!();
    println!("Comment prefix:  {}", cfg.comment_prefix);
    println!("Updated suffix:  {}", cfg.updated_suffix);
    println!("Verbose:         {}", cfg.verbose);

    Ok(())
}
