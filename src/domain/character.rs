//! Characters and the speaker mentions that get marked in the text.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// An entry of the document's character list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: usize,
    pub name: String,
    pub aliases: String,
}

/// A speaker mention that will be wrapped in a `<mention>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMention {
    pub id: String,
    /// Global index of the first token
    pub start: usize,
    /// Global index of the last token
    pub end: usize,
    pub cluster: String,
}

/// Speaker cluster id to label, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerLabels {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl SpeakerLabels {
    /// Add a cluster; a cluster seen before keeps its position and label
    pub fn insert(&mut self, cluster: impl Into<String>, label: impl Into<String>) {
        let cluster = cluster.into();
        if let Entry::Vacant(slot) = self.positions.entry(cluster.clone()) {
            slot.insert(self.entries.len());
            self.entries.push((cluster, label.into()));
        }
    }

    pub fn get(&self, cluster: &str) -> Option<&str> {
        self.positions
            .get(cluster)
            .map(|&i| self.entries[i].1.as_str())
    }

    /// Label for a cluster, empty if the cluster has none
    pub fn label_or_empty(&self, cluster: &str) -> &str {
        self.get(cluster).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The character list, numbered in insertion order
    pub fn characters(&self) -> Vec<Character> {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, (_, label))| Character {
                id,
                name: label.clone(),
                aliases: label.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_labels_keep_first_seen_order() {
        let mut labels = SpeakerLabels::default();
        labels.insert("12", "Jan");
        labels.insert("4", "Marie");
        labels.insert("12", "Johannes");

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("12"), Some("Jan"));
        assert_eq!(labels.label_or_empty("99"), "");

        let characters = labels.characters();
        assert_eq!(characters[0].id, 0);
        assert_eq!(characters[0].name, "Jan");
        assert_eq!(characters[1].id, 1);
        assert_eq!(characters[1].aliases, "Marie");
    }
}
