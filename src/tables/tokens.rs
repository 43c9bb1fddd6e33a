//! Token table reader.
//!
//! Whitespace-delimited, one token per line. A blank line ends a sentence
//! and lines starting with the comment prefix are skipped.

use std::path::Path;

use crate::config::ColumnLayout;
use crate::domain::{QuoteIob, Sentence, SentenceId, Token};

use super::TableError;

/// All sentences of a document, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    pub sentences: Vec<Sentence>,
}

impl TokenTable {
    /// Read a token table from disk
    pub fn from_path(
        path: &Path,
        layout: &ColumnLayout,
        comment_prefix: &str,
    ) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, layout, comment_prefix)
    }

    /// Parse a token table
    pub fn parse(
        input: &str,
        layout: &ColumnLayout,
        comment_prefix: &str,
    ) -> Result<Self, TableError> {
        let mut sentences = Vec::new();
        let mut current: Option<Sentence> = None;
        let mut global_index = 1;

        for (lineno, line) in input.lines().enumerate() {
            if !comment_prefix.is_empty() && line.starts_with(comment_prefix) {
                continue;
            }

            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.is_empty() {
                sentences.extend(current.take());
                continue;
            }

            if columns.len() < layout.width() {
                return Err(TableError::MissingColumns {
                    line: lineno + 1,
                    expected: layout.width(),
                    found: columns.len(),
                });
            }

            let id: SentenceId = columns[layout.sentence_id]
                .parse()
                .map_err(|message| TableError::SentenceId {
                    line: lineno + 1,
                    message,
                })?;

            let sentence = current.get_or_insert_with(|| Sentence {
                id,
                tokens: Vec::new(),
            });
            let local_index = sentence.tokens.len();
            sentence.tokens.push(Token {
                sentence: id,
                local_index,
                global_index,
                text: columns[layout.token].to_string(),
                speaker_cluster: columns[layout.speaker].to_string(),
                quote: QuoteIob::from_tag(columns[layout.quote]),
            });
            global_index += 1;
        }
        sentences.extend(current);

        Ok(Self { sentences })
    }

    /// All tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|s| s.tokens.iter())
    }

    /// Total number of tokens
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(|s| s.tokens.len()).sum()
    }

    /// Distinct sentence ids in order of first appearance
    pub fn sentence_ids(&self) -> Vec<SentenceId> {
        let mut ids: Vec<SentenceId> = Vec::with_capacity(self.sentences.len());
        for sentence in &self.sentences {
            if !ids.contains(&sentence.id) {
                ids.push(sentence.id);
            }
        }
        ids
    }
}
