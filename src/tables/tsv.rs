//! Mentions, quotes and clusters tables.
//!
//! Tab-separated with a header row; quoting is disabled because quote
//! text routinely contains `"`. Columns not named here are ignored.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{ActiveMention, SpeakerLabels};

use super::TableError;

/// Marker for an empty id cell
pub const NO_ID: &str = "-";

/// A row of a `*.mentions.tsv` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MentionRow {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub cluster: String,
}

/// A row of a `*.quotes.tsv` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoteRow {
    pub start: usize,
    #[serde(default)]
    pub text: String,
    pub speakermention: String,
    pub speakercluster: String,
}

impl QuoteRow {
    /// The attributed speaker mention id, if the system assigned one
    pub fn speaker_mention(&self) -> Option<&str> {
        (self.speakermention != NO_ID).then_some(self.speakermention.as_str())
    }

    pub fn speaker_cluster(&self) -> Option<&str> {
        (self.speakercluster != NO_ID).then_some(self.speakercluster.as_str())
    }
}

/// A row of a `*.clusters.tsv` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterRow {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub mentions: String,
}

impl ClusterRow {
    /// Ids of the member mentions
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.mentions
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Read a tab-separated table from disk
pub fn read_tsv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TableError> {
    let file = std::fs::File::open(path)?;
    read_tsv_from(file)
}

/// Read a tab-separated table from any reader
pub fn read_tsv_from<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Labels of every cluster that speaks at least one quote
pub fn speaker_labels(
    quotes: &[QuoteRow],
    clusters: &[ClusterRow],
) -> Result<SpeakerLabels, TableError> {
    let mut by_id: HashMap<&str, &ClusterRow> = HashMap::with_capacity(clusters.len());
    for cluster in clusters {
        by_id.entry(cluster.id.as_str()).or_insert(cluster);
    }

    let mut labels = SpeakerLabels::default();
    for cluster_id in quotes.iter().filter_map(QuoteRow::speaker_cluster) {
        if labels.get(cluster_id).is_some() {
            continue;
        }
        let cluster = by_id
            .get(cluster_id)
            .ok_or_else(|| TableError::UnknownCluster(cluster_id.to_string()))?;
        labels.insert(cluster_id, cluster.label.clone());
    }
    Ok(labels)
}

/// Speaker mentions referenced by the quotes table, keyed by start token
pub fn active_mentions(
    quotes: &[QuoteRow],
    mentions: &[MentionRow],
) -> Result<BTreeMap<usize, ActiveMention>, TableError> {
    let mut by_id: HashMap<&str, &MentionRow> = HashMap::with_capacity(mentions.len());
    for mention in mentions {
        by_id.entry(mention.id.as_str()).or_insert(mention);
    }

    let mut active = BTreeMap::new();
    for mention_id in quotes.iter().filter_map(QuoteRow::speaker_mention) {
        let row = by_id
            .get(mention_id)
            .ok_or_else(|| TableError::UnknownMention(mention_id.to_string()))?;
        active.insert(
            row.start,
            ActiveMention {
                id: row.id.clone(),
                start: row.start,
                end: row.end,
                cluster: row.cluster.clone(),
            },
        );
    }
    Ok(active)
}
