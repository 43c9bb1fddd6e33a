//! Loading of gold and system evaluation data.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::document::{Document, Element};
use crate::tables::{read_tsv, ClusterRow, MentionRow, QuoteRow};

use super::EvalError;

/// Global token span of a gold speaker mention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldMention {
    pub start: usize,
    pub end: usize,
}

/// A quote of the gold document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldQuote {
    pub text: String,
    pub connection: Option<String>,
    pub global_begin: usize,
    pub begin: usize,
    pub end: usize,
    /// The linked speaker mention, if the annotator connected one
    pub mention: Option<GoldMention>,
}

fn numeric_attr(element: &Element, attribute: &str) -> Result<usize, EvalError> {
    element
        .attr(attribute)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| EvalError::Attribute {
            element: element.name.clone(),
            attribute: attribute.to_string(),
        })
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Gold quotes keyed by their global begin token
pub fn gold_quotes(document: &Document) -> Result<BTreeMap<usize, GoldQuote>, EvalError> {
    let mut mentions: HashMap<&str, &Element> = HashMap::new();
    for mention in document.root.find_all("mention") {
        if let Some(id) = mention.attr("id") {
            mentions.entry(id).or_insert(mention);
        }
    }
    let mut quotes = BTreeMap::new();

    for element in document.root.find_all("quote") {
        let connection = element.attr("connection").map(str::to_string);
        let mention = match connection.as_deref() {
            Some(id) => mentions
                .get(id)
                .map(|m| -> Result<GoldMention, EvalError> {
                    let start = numeric_attr(m, "ttokenno")?;
                    let width = numeric_attr(m, "end")?.saturating_sub(numeric_attr(m, "begin")?);
                    Ok(GoldMention {
                        start,
                        end: start + width,
                    })
                })
                .transpose()?,
            None => None,
        };

        let quote = GoldQuote {
            text: normalize_whitespace(&element.text_content()?),
            connection,
            global_begin: numeric_attr(element, "ttokenno")?,
            begin: numeric_attr(element, "begin")?,
            end: numeric_attr(element, "end")?,
            mention,
        };
        quotes.insert(quote.global_begin, quote);
    }

    Ok(quotes)
}

fn prefixed(prefix: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", prefix, suffix))
}

/// Mention id to global span; the first row of a repeated id wins
fn span_index(mentions: &[MentionRow]) -> HashMap<String, (usize, usize)> {
    let mut spans = HashMap::with_capacity(mentions.len());
    for mention in mentions {
        spans
            .entry(mention.id.clone())
            .or_insert((mention.start, mention.end));
    }
    spans
}

/// Corrected gold annotations, indexed for scoring
#[derive(Debug, Clone, Default)]
pub struct GoldStandard {
    pub quotes: BTreeMap<usize, GoldQuote>,
    mention_spans: HashMap<String, (usize, usize)>,
    /// Cluster of the first gold mention at each span
    span_clusters: HashMap<(usize, usize), String>,
    clusters: HashMap<String, ClusterRow>,
}

impl GoldStandard {
    pub fn new(
        quotes: BTreeMap<usize, GoldQuote>,
        mentions: Vec<MentionRow>,
        clusters: Vec<ClusterRow>,
    ) -> Self {
        let mention_spans = span_index(&mentions);

        let mut span_clusters = HashMap::with_capacity(mentions.len());
        for mention in mentions {
            span_clusters
                .entry((mention.start, mention.end))
                .or_insert(mention.cluster);
        }

        let mut by_id = HashMap::with_capacity(clusters.len());
        for cluster in clusters {
            by_id.entry(cluster.id.clone()).or_insert(cluster);
        }

        Self {
            quotes,
            mention_spans,
            span_clusters,
            clusters: by_id,
        }
    }

    /// Load the gold document and `<prefix>.mentions.tsv` / `<prefix>.clusters.tsv`
    pub fn load(document: &Path, prefix: &str) -> Result<Self, EvalError> {
        let document = Document::from_path(document)?;
        Ok(Self::new(
            gold_quotes(&document)?,
            read_tsv(&prefixed(prefix, ".mentions.tsv"))?,
            read_tsv(&prefixed(prefix, ".clusters.tsv"))?,
        ))
    }

    /// Id of the cluster of the gold mention with exactly this span
    pub fn cluster_of(&self, mention: GoldMention) -> Option<&str> {
        self.span_clusters
            .get(&(mention.start, mention.end))
            .map(String::as_str)
    }

    /// Spans of all members of a gold cluster
    pub fn cluster_spans(&self, cluster_id: &str) -> Result<HashSet<(usize, usize)>, EvalError> {
        let cluster = self
            .clusters
            .get(cluster_id)
            .ok_or_else(|| EvalError::MissingGoldCluster(cluster_id.to_string()))?;

        cluster
            .member_ids()
            .map(|id| {
                self.mention_spans
                    .get(id)
                    .copied()
                    .ok_or_else(|| EvalError::MissingGoldMention(id.to_string()))
            })
            .collect()
    }
}

/// Output of the attribution system under evaluation
#[derive(Debug, Clone, Default)]
pub struct SystemOutput {
    pub quotes: Vec<QuoteRow>,
    mention_spans: HashMap<String, (usize, usize)>,
}

impl SystemOutput {
    pub fn new(quotes: Vec<QuoteRow>, mentions: Vec<MentionRow>) -> Self {
        Self {
            quotes,
            mention_spans: span_index(&mentions),
        }
    }

    /// Load `<prefix>.quotes.tsv` and `<prefix>.mentions.tsv`
    pub fn load(prefix: &str) -> Result<Self, EvalError> {
        Ok(Self::new(
            read_tsv(&prefixed(prefix, ".quotes.tsv"))?,
            read_tsv::<MentionRow>(&prefixed(prefix, ".mentions.tsv"))?,
        ))
    }

    /// Span of a system mention by id
    pub fn mention_span(&self, id: &str) -> Result<(usize, usize), EvalError> {
        self.mention_spans
            .get(id)
            .copied()
            .ok_or_else(|| EvalError::MissingSystemMention(id.to_string()))
    }
}
