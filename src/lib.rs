//! quote-align - Quote and speaker-mention alignment for annotated novels
//!
//! Converts the output of a coreference and quote-attribution pipeline
//! into a tagged document for manual annotation, recovers exact token
//! offsets after the annotator has edited the tags, and scores a system's
//! speaker attributions against the corrected annotations.
//!
//! # Modules
//!
//! - `tables`: Token table and TSV readers
//! - `document`: The tagged XML document
//! - `core`: Span building, boundary extraction, pairing and updating
//! - `eval`: Precision/recall/F1 for mention and cluster attribution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Create a document for annotation
//! quote-align create -b novel.conll -m novel.mentions.tsv -q novel.quotes.tsv -c novel.clusters.tsv > novel.xml
//!
//! # Recompute offsets after annotation
//! quote-align update -x novel_annotated.xml -b novel.conll
//!
//! # Score system output
//! quote-align evaluate novel_annotated_updated.xml /tmp/novel gold/novel
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod document;
pub mod domain;
pub mod eval;
pub mod tables;

// Re-export main types at crate root for convenience
pub use core::{build_document, update_document, AlignError, UpdateOutcome};
pub use document::{Document, DocumentError};
pub use domain::{BoundaryEvent, BoundaryKind, SpanKind, SpanPair, SpanPosition, Token};
pub use eval::{evaluate, EvalError, Evaluation, Score};
pub use tables::{TableError, TokenTable};
