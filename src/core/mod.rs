//! Core realignment logic.
//!
//! This module contains:
//! - Builder: Token table to tagged text
//! - Extractor: Boundary events from edited tagged text
//! - Pairer: Matching of (possibly nested) boundary events
//! - Updater: Positional attributes and character list cleanup

pub mod builder;
pub mod error;
pub mod extractor;
pub mod pairer;
pub mod updater;

// Re-export commonly used types
pub use builder::build_document;
pub use error::AlignError;
pub use extractor::{classify_units, extract_document, extract_line, BoundaryEvents, LineEvents, Unit};
pub use pairer::{pair_events, pair_mentions, pair_quotes};
pub use updater::{apply_positions, clean_characters, update_document, UpdateOutcome};
