//! Domain types for quote/mention alignment.
//!
//! This module contains the core data structures:
//! - Token: Per-token records of the token table
//! - Span: Boundary events, pairs and the positions derived from them
//! - Character: Speaker labels and active mentions

pub mod character;
pub mod span;
pub mod token;

// Re-export commonly used types
pub use character::{ActiveMention, Character, SpeakerLabels};
pub use span::{BoundaryEvent, BoundaryKind, SpanKind, SpanPair, SpanPosition};
pub use token::{QuoteIob, Sentence, SentenceId, Token};
