//! Span attribute updater.
//!
//! Trusts the edited document's structure (which spans exist, their kind
//! and order) and rewrites only the positional attributes of each span from
//! the recovered boundary pairs. Afterwards the character list is reduced
//! to the speakers that some mention still refers to.

use std::collections::BTreeSet;

use crate::document::{text_body, Document, Element, Node};
use crate::domain::{SpanKind, SpanPair, SpanPosition};
use crate::tables::TokenTable;

use super::error::AlignError;
use super::extractor::extract_document;
use super::pairer::pair_events;

/// Write positional attributes onto every span element of `kind`
///
/// Fails without touching the tree if the number of elements differs from
/// the number of pairs, or if a pair covers no token.
pub fn apply_positions(
    root: &mut Element,
    kind: SpanKind,
    pairs: Vec<SpanPair>,
) -> Result<usize, AlignError> {
    let name = kind.element_name();
    let elements = root.find_all(name).len();
    if elements != pairs.len() {
        return Err(AlignError::PairCountMismatch {
            kind,
            elements,
            pairs: pairs.len(),
        });
    }

    let positions = pairs
        .iter()
        .map(|pair| {
            pair.position().ok_or(AlignError::EmptySpan {
                kind,
                global: pair.open.global_count,
            })
        })
        .collect::<Result<Vec<SpanPosition>, AlignError>>()?;

    let mut positions = positions.into_iter();
    root.for_each_named_mut(name, &mut |element: &mut Element| {
        if let Some(pos) = positions.next() {
            element.set_attr("parno", pos.paragraph);
            element.set_attr("sentno", pos.sentence);
            element.set_attr("begin", pos.begin);
            element.set_attr("end", pos.end);
            element.set_attr("ttokenno", pos.global_begin);
        }
    });

    Ok(elements)
}

/// Speaker labels referenced by any mention
pub fn mentioned_speakers(root: &Element) -> BTreeSet<String> {
    root.find_all(SpanKind::Mention.element_name())
        .into_iter()
        .filter_map(|mention| mention.attr("speaker"))
        .map(str::to_string)
        .collect()
}

/// Drop `<character>` entries whose name is not in `keep`
pub fn retain_characters(root: &mut Element, keep: &BTreeSet<String>) -> usize {
    let Some(characters) = root.child_mut("characters") else {
        return 0;
    };

    let before = characters.children.len();
    let children = std::mem::take(&mut characters.children);
    characters.children = children
        .into_iter()
        .filter(|node| match node {
            Node::Element(e) if e.name == "character" => {
                e.attr("name").is_some_and(|name| keep.contains(name))
            }
            _ => true,
        })
        .collect();

    before - characters.children.len()
}

/// Remove characters no mention refers to; returns how many were removed
pub fn clean_characters(root: &mut Element) -> usize {
    let keep = mentioned_speakers(root);
    retain_characters(root, &keep)
}

/// Summary of a document update
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub document: Document,
    pub quotes: usize,
    pub mentions: usize,
    pub removed_characters: usize,
    pub malformed: usize,
}

/// Recompute span offsets of an edited document against its token table
pub fn update_document(xml: &str, table: &TokenTable) -> Result<UpdateOutcome, AlignError> {
    let body = text_body(xml)?;
    let events = extract_document(body, &table.sentence_ids())?;

    if events.tokens != table.token_count() {
        tracing::warn!(
            text = events.tokens,
            table = table.token_count(),
            "Token count of the text body differs from the token table"
        );
    }

    let mut document = Document::parse(xml)?;
    let quotes = apply_positions(
        &mut document.root,
        SpanKind::Quote,
        pair_events(SpanKind::Quote, events.quotes)?,
    )?;
    let mentions = apply_positions(
        &mut document.root,
        SpanKind::Mention,
        pair_events(SpanKind::Mention, events.mentions)?,
    )?;
    let removed_characters = clean_characters(&mut document.root);

    tracing::info!(quotes, mentions, removed_characters, "Updated span attributes");

    Ok(UpdateOutcome {
        document,
        quotes,
        mentions,
        removed_characters,
        malformed: events.malformed,
    })
}
