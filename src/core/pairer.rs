//! Pairing of boundary events into spans.
//!
//! Quote markers arrive in text order, so with nested quotes the closes
//! of inner and outer quotes interleave with the opens. Each open is paired
//! with the close that balances its nesting depth, and pairs are returned
//! in the order of their opens, which is the document order of the
//! `<quote>` elements. Mentions never nest and pair by adjacency.

use crate::domain::{BoundaryEvent, BoundaryKind, SpanKind, SpanPair};

use super::error::AlignError;

fn unmatched_close(event: &BoundaryEvent) -> AlignError {
    AlignError::UnmatchedClose {
        kind: event.kind.span_kind(),
        paragraph: event.paragraph,
        sentence: event.sentence,
        global: event.global_count,
    }
}

fn unmatched_open(event: &BoundaryEvent) -> AlignError {
    AlignError::UnmatchedOpen {
        kind: event.kind.span_kind(),
        paragraph: event.paragraph,
        sentence: event.sentence,
        global: event.global_count,
    }
}

fn expect_kind(event: &BoundaryEvent, expected: SpanKind) -> Result<(), AlignError> {
    if event.kind.span_kind() == expected {
        Ok(())
    } else {
        Err(AlignError::UnexpectedBoundary {
            expected,
            found: event.kind,
        })
    }
}

/// Pair possibly nested quote events, ordered by their opening event
pub fn pair_quotes(events: Vec<BoundaryEvent>) -> Result<Vec<SpanPair>, AlignError> {
    let mut slots: Vec<(BoundaryEvent, Option<BoundaryEvent>)> = Vec::with_capacity(events.len() / 2);
    let mut open_slots: Vec<usize> = Vec::new();

    for event in events {
        expect_kind(&event, SpanKind::Quote)?;
        if event.kind.is_begin() {
            open_slots.push(slots.len());
            slots.push((event, None));
        } else {
            let slot = open_slots.pop().ok_or_else(|| unmatched_close(&event))?;
            slots[slot].1 = Some(event);
        }
    }

    slots
        .into_iter()
        .map(|(open, close)| {
            close
                .map(|close| SpanPair::new(open, close))
                .ok_or_else(|| unmatched_open(&open))
        })
        .collect()
}

/// Pair mention events by adjacency
pub fn pair_mentions(events: Vec<BoundaryEvent>) -> Result<Vec<SpanPair>, AlignError> {
    let mut pairs = Vec::with_capacity(events.len() / 2);
    let mut events = events.into_iter();

    while let Some(open) = events.next() {
        expect_kind(&open, SpanKind::Mention)?;
        if open.kind != BoundaryKind::BeginMention {
            return Err(unmatched_close(&open));
        }
        let close = events.next().ok_or_else(|| unmatched_open(&open))?;
        expect_kind(&close, SpanKind::Mention)?;
        if close.kind != BoundaryKind::EndMention {
            return Err(AlignError::MisorderedMention {
                paragraph: close.paragraph,
                sentence: close.sentence,
                global: close.global_count,
            });
        }
        pairs.push(SpanPair::new(open, close));
    }

    Ok(pairs)
}

/// Pair events of either kind
pub fn pair_events(kind: SpanKind, events: Vec<BoundaryEvent>) -> Result<Vec<SpanPair>, AlignError> {
    match kind {
        SpanKind::Quote => pair_quotes(events),
        SpanKind::Mention => pair_mentions(events),
    }
}
