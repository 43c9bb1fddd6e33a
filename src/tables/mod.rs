//! Readers for the tabular inputs produced by the coreference pipeline.
//!
//! - `tokens`: the BookNLP-style token table (one token per line)
//! - `tsv`: mentions, quotes and clusters tables

pub mod tokens;
pub mod tsv;

use thiserror::Error;

pub use tokens::TokenTable;
pub use tsv::{
    active_mentions, read_tsv, read_tsv_from, speaker_labels, ClusterRow, MentionRow, QuoteRow,
};

/// Errors raised while reading tabular inputs
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {message}")]
    SentenceId { line: usize, message: String },

    #[error("Unknown cluster id: {0}")]
    UnknownCluster(String),

    #[error("Unknown mention id: {0}")]
    UnknownMention(String),
}
