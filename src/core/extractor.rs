//! Tag-event extractor.
//!
//! Scans the tagged lines of an edited document and records, for every
//! quote and mention marker, how many plain tokens preceded it on the line
//! and in the whole document. Tags are lexed explicitly rather than
//! rewritten into sentinel words:
//!
//! - an opening marker ends the unit it is attached to on its right,
//! - a closing marker ends the unit on its left,
//! - any other tag is dropped without separating the text around it.
//!
//! A whitespace-delimited unit that still mixes a marker with text (for
//! example `word<quote ...>` or `</mention>,`) is malformed: it is reported
//! and skipped, and counts as no token.

use crate::domain::{BoundaryEvent, BoundaryKind, SentenceId};

use super::error::AlignError;

/// A whitespace-delimited unit of a tagged line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Marker(BoundaryKind),
    Word(String),
    Malformed(String),
}

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Marker(BoundaryKind, String),
}

/// Classify a tag as one of the span markers, or `None` for any other tag
fn classify_tag(tag: &str) -> Option<BoundaryKind> {
    let inner = tag.strip_prefix('<')?.strip_suffix('>')?;
    if inner.ends_with('/') {
        return None;
    }
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name = inner
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");

    match (name, closing) {
        ("quote", false) => Some(BoundaryKind::BeginQuote),
        ("quote", true) => Some(BoundaryKind::EndQuote),
        ("mention", false) => Some(BoundaryKind::BeginMention),
        ("mention", true) => Some(BoundaryKind::EndMention),
        _ => None,
    }
}

fn finish(pieces: &mut Vec<Piece>, units: &mut Vec<Unit>) {
    let unit = match pieces.as_slice() {
        [] => return,
        [Piece::Marker(kind, _)] => Unit::Marker(*kind),
        all if all.iter().all(|p| matches!(p, Piece::Text(_))) => Unit::Word(
            all.iter()
                .map(|p| match p {
                    Piece::Text(t) | Piece::Marker(_, t) => t.as_str(),
                })
                .collect(),
        ),
        mixed => Unit::Malformed(
            mixed
                .iter()
                .map(|p| match p {
                    Piece::Text(t) | Piece::Marker(_, t) => t.as_str(),
                })
                .collect(),
        ),
    };
    units.push(unit);
    pieces.clear();
}

/// Split a tagged line into markers, plain words and malformed units
pub fn classify_units(line: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    let mut pieces: Vec<Piece> = Vec::new();
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            finish(&mut pieces, &mut units);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if c == '<' {
            if let Some(close) = rest.find('>') {
                let tag = &rest[..=close];
                rest = &rest[close + 1..];
                match classify_tag(tag) {
                    Some(kind) if kind.is_begin() => {
                        pieces.push(Piece::Marker(kind, tag.to_string()));
                        finish(&mut pieces, &mut units);
                    }
                    Some(kind) => {
                        finish(&mut pieces, &mut units);
                        pieces.push(Piece::Marker(kind, tag.to_string()));
                    }
                    None => {}
                }
                continue;
            }
        }

        let end = rest
            .find(|ch: char| ch.is_whitespace() || ch == '<')
            .filter(|&i| i > 0)
            .unwrap_or(rest.len());
        match pieces.last_mut() {
            Some(Piece::Text(text)) => text.push_str(&rest[..end]),
            _ => pieces.push(Piece::Text(rest[..end].to_string())),
        }
        rest = &rest[end..];
    }
    finish(&mut pieces, &mut units);

    units
}

/// Boundary events recovered from one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEvents {
    pub quotes: Vec<BoundaryEvent>,
    pub mentions: Vec<BoundaryEvent>,
    pub malformed: Vec<String>,
    /// Global count after the last plain token of the line
    pub global_count: usize,
}

/// Record the boundary events of one sentence line
///
/// `global_count` is the 1-based global index of the line's first token.
pub fn extract_line(line: &str, sentence: SentenceId, global_count: usize) -> LineEvents {
    let mut events = LineEvents {
        global_count,
        ..Default::default()
    };
    let mut local_count = 0;

    for unit in classify_units(line) {
        match unit {
            Unit::Word(_) => {
                local_count += 1;
                events.global_count += 1;
            }
            Unit::Malformed(raw) => events.malformed.push(raw),
            Unit::Marker(kind) => {
                // A close at the start of a line ends the previous sentence
                let sentno = if kind == BoundaryKind::EndQuote && local_count == 0 {
                    sentence.sentence.saturating_sub(1)
                } else {
                    sentence.sentence
                };
                let event = BoundaryEvent {
                    paragraph: sentence.paragraph,
                    sentence: sentno,
                    local_count,
                    global_count: events.global_count,
                    kind,
                };
                match kind {
                    BoundaryKind::BeginQuote | BoundaryKind::EndQuote => events.quotes.push(event),
                    BoundaryKind::BeginMention | BoundaryKind::EndMention => {
                        events.mentions.push(event)
                    }
                }
            }
        }
    }

    events
}

/// Boundary events recovered from a whole text body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryEvents {
    pub quotes: Vec<BoundaryEvent>,
    pub mentions: Vec<BoundaryEvent>,
    pub malformed: usize,
    /// Plain tokens seen
    pub tokens: usize,
}

fn join(target: &mut String, raw: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(raw);
}

/// Group the body into one line per sentence
///
/// Blank lines are dropped. A line without plain tokens is joined onto a
/// neighbour by the direction of its markers: opening markers onto the
/// sentence that follows, closing markers (typically a trailing
/// `</quote>`) onto the sentence before. Both directions on one such line
/// cannot be placed and are rejected.
pub fn sentence_lines(body: &str) -> Result<Vec<String>, AlignError> {
    let mut lines: Vec<String> = Vec::new();
    let mut pending = String::new();
    let mut pending_from = 0;

    for (lineno, raw) in body.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }

        let units = classify_units(raw);
        if units.iter().any(|unit| matches!(unit, Unit::Word(_))) {
            let mut line = std::mem::take(&mut pending);
            join(&mut line, raw);
            lines.push(line);
            continue;
        }

        let (opens, closes) = units.iter().fold((0, 0), |(opens, closes), unit| match unit {
            Unit::Marker(kind) if kind.is_begin() => (opens + 1, closes),
            Unit::Marker(_) => (opens, closes + 1),
            _ => (opens, closes),
        });
        if opens > 0 && closes > 0 {
            return Err(AlignError::MixedMarkerLine { line: lineno + 1 });
        }

        match lines.last_mut() {
            Some(previous) if opens == 0 && pending.is_empty() => join(previous, raw),
            _ => {
                if pending.is_empty() {
                    pending_from = lineno + 1;
                }
                join(&mut pending, raw);
            }
        }
    }

    if !pending.is_empty() {
        return Err(AlignError::UnattachedMarkers { line: pending_from });
    }
    Ok(lines)
}

/// Recover all boundary events of a text body
///
/// Each sentence line is matched, in order, with one sentence id of the
/// token table; differing counts are an error.
pub fn extract_document(
    body: &str,
    sentence_ids: &[SentenceId],
) -> Result<BoundaryEvents, AlignError> {
    let lines = sentence_lines(body)?;
    if lines.len() != sentence_ids.len() {
        return Err(AlignError::LineCountMismatch {
            lines: lines.len(),
            sentences: sentence_ids.len(),
        });
    }

    let mut events = BoundaryEvents::default();
    let mut global_count = 1;

    for (lineno, (line, id)) in lines.iter().zip(sentence_ids).enumerate() {
        let found = extract_line(line, *id, global_count);
        for raw in &found.malformed {
            tracing::error!(line = lineno + 1, sentence = %id, unit = %raw, "Malformed quote or mention tag, skipping");
        }

        events.malformed += found.malformed.len();
        events.tokens += found.global_count - global_count;
        events.quotes.extend(found.quotes);
        events.mentions.extend(found.mentions);
        global_count = found.global_count;
    }

    Ok(events)
}
