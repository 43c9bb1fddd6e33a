//! Quote attribution evaluation.
//!
//! Scores a system's quote-speaker attributions against a corrected gold
//! document: quotes are matched by global begin token, speaker mentions by
//! exact token offsets, and clusters by membership of the system mention
//! in the gold mention's coreference cluster.

pub mod gold;
pub mod report;
pub mod scorer;

use thiserror::Error;

use crate::document::DocumentError;
use crate::tables::TableError;

pub use gold::{gold_quotes, GoldMention, GoldQuote, GoldStandard, SystemOutput};
pub use report::{render_json, render_text};
pub use scorer::{evaluate, Evaluation, Score};

/// Errors raised while loading or scoring evaluation data
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("<{element}> has a missing or invalid '{attribute}' attribute")]
    Attribute { element: String, attribute: String },

    #[error("System mention {0} not found in the system mentions table")]
    MissingSystemMention(String),

    #[error("Gold cluster {0} not found in the gold clusters table")]
    MissingGoldCluster(String),

    #[error("Gold mention {0} not found in the gold mentions table")]
    MissingGoldMention(String),
}
