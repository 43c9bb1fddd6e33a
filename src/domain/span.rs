//! Span kinds, recovered boundary events and their pairings.

/// The two kinds of annotated spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Quote,
    Mention,
}

impl SpanKind {
    /// XML element name carrying this span
    pub fn element_name(&self) -> &'static str {
        match self {
            SpanKind::Quote => "quote",
            SpanKind::Mention => "mention",
        }
    }
}

/// Which boundary of which span kind an event marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    BeginQuote,
    EndQuote,
    BeginMention,
    EndMention,
}

impl BoundaryKind {
    pub fn span_kind(&self) -> SpanKind {
        match self {
            BoundaryKind::BeginQuote | BoundaryKind::EndQuote => SpanKind::Quote,
            BoundaryKind::BeginMention | BoundaryKind::EndMention => SpanKind::Mention,
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, BoundaryKind::BeginQuote | BoundaryKind::BeginMention)
    }
}

/// Position at which a boundary marker occurred in the tagged text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryEvent {
    pub paragraph: usize,
    pub sentence: usize,
    /// Plain tokens seen so far on the sentence line
    pub local_count: usize,
    /// 1-based global index of the next plain token
    pub global_count: usize,
    pub kind: BoundaryKind,
}

/// Positional attributes written onto a span element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanPosition {
    pub paragraph: usize,
    pub sentence: usize,
    pub begin: usize,
    pub end: usize,
    pub global_begin: usize,
}

/// An open boundary together with the close that balances it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanPair {
    pub open: BoundaryEvent,
    pub close: BoundaryEvent,
}

impl SpanPair {
    pub fn new(open: BoundaryEvent, close: BoundaryEvent) -> Self {
        Self { open, close }
    }

    /// Number of plain tokens between the two markers
    pub fn token_count(&self) -> usize {
        self.close.global_count.saturating_sub(self.open.global_count)
    }

    /// Positional attributes, or `None` if the span covers no token
    pub fn position(&self) -> Option<SpanPosition> {
        let inner = self.token_count().checked_sub(1)?;
        Some(SpanPosition {
            paragraph: self.open.paragraph,
            sentence: self.open.sentence,
            begin: self.open.local_count,
            end: self.open.local_count + inner,
            global_begin: self.open.global_count,
        })
    }
}
