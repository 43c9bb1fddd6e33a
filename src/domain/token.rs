//! Tokens read from a BookNLP-style token table.

use std::fmt;
use std::str::FromStr;

/// A `parno-sentno` sentence identifier as found in the token table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceId {
    pub paragraph: usize,
    pub sentence: usize,
}

impl SentenceId {
    pub fn new(paragraph: usize, sentence: usize) -> Self {
        Self {
            paragraph,
            sentence,
        }
    }
}

impl FromStr for SentenceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (par, sent) = s
            .split_once('-')
            .ok_or_else(|| format!("expected <parno>-<sentno>, got '{}'", s))?;
        let paragraph = par
            .parse()
            .map_err(|_| format!("invalid paragraph number in '{}'", s))?;
        let sentence = sent
            .parse()
            .map_err(|_| format!("invalid sentence number in '{}'", s))?;
        Ok(Self::new(paragraph, sentence))
    }
}

impl fmt::Display for SentenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.paragraph, self.sentence)
    }
}

/// Quotation IOB marker of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteIob {
    /// Token opens a quotation
    Begin,
    /// Token continues an open quotation
    Inside,
    /// Anything else
    #[default]
    Outside,
}

impl QuoteIob {
    /// Map the raw table tag (`B`, `I`, anything else)
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "B" => QuoteIob::Begin,
            "I" => QuoteIob::Inside,
            _ => QuoteIob::Outside,
        }
    }
}

/// One token of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Sentence the token belongs to
    pub sentence: SentenceId,
    /// 0-based position within the sentence
    pub local_index: usize,
    /// 1-based position within the whole document
    pub global_index: usize,
    /// Surface form
    pub text: String,
    /// Resolved speaker cluster id, as written in the table
    pub speaker_cluster: String,
    /// Quotation marker
    pub quote: QuoteIob,
}

/// A run of tokens between two blank lines of the token table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub id: SentenceId,
    pub tokens: Vec<Token>,
}
