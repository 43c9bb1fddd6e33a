//! Errors raised while realigning span offsets.

use thiserror::Error;

use crate::document::DocumentError;
use crate::domain::{BoundaryKind, SpanKind};

/// Structural failures that invalidate a document update
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("{kind:?} closed at token {global} (sentence {paragraph}-{sentence}) without an open span")]
    UnmatchedClose {
        kind: SpanKind,
        paragraph: usize,
        sentence: usize,
        global: usize,
    },

    #[error("{kind:?} opened at token {global} (sentence {paragraph}-{sentence}) is never closed")]
    UnmatchedOpen {
        kind: SpanKind,
        paragraph: usize,
        sentence: usize,
        global: usize,
    },

    #[error("Mention markers out of order at token {global} (sentence {paragraph}-{sentence})")]
    MisorderedMention {
        paragraph: usize,
        sentence: usize,
        global: usize,
    },

    #[error("Expected {expected:?} boundary, found {found:?}")]
    UnexpectedBoundary {
        expected: SpanKind,
        found: BoundaryKind,
    },

    #[error("{kind:?} at token {global} covers no tokens")]
    EmptySpan { kind: SpanKind, global: usize },

    #[error("Found {elements} <{}> elements but {pairs} boundary pairs", .kind.element_name())]
    PairCountMismatch {
        kind: SpanKind,
        elements: usize,
        pairs: usize,
    },

    #[error("Text body has {lines} sentence lines but the token table has {sentences} sentences")]
    LineCountMismatch { lines: usize, sentences: usize },

    #[error("Text body line {line} holds only markers, both opening and closing")]
    MixedMarkerLine { line: usize },

    #[error("Markers on text body line {line} precede no sentence")]
    UnattachedMarkers { line: usize },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}
