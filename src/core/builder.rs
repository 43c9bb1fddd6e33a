//! Span builder: renders a token table as tagged text.
//!
//! Quote boundaries come from the token table's IOB column, speaker
//! mentions from the active mentions keyed by their first global token.
//! Offsets are implicit in the output; the updater recovers them later.

use std::collections::BTreeMap;
use std::fmt::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::domain::{ActiveMention, QuoteIob, SpeakerLabels};
use crate::tables::TokenTable;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Render the tagged document, one sentence per line
pub fn build_document(
    table: &TokenTable,
    labels: &SpeakerLabels,
    mentions: &BTreeMap<usize, ActiveMention>,
) -> String {
    let mut lines = vec![XML_DECLARATION.to_string(), header(labels)];

    let mut quote_open = false;
    let mut mention_end: Option<usize> = None;

    for sentence in &table.sentences {
        let mut line = String::new();

        for token in &sentence.tokens {
            if quote_open && token.quote != QuoteIob::Inside {
                line.push_str("</quote>");
                quote_open = false;
            }

            let mention = mentions.get(&token.global_index);
            if let Some(mention) = mention {
                let speaker = labels.label_or_empty(&mention.cluster);
                let _ = write!(line, " <mention speaker=\"{}\">", escape(speaker));
                mention_end = Some(mention.end);
            }

            let text = partial_escape(&token.text);
            if token.quote == QuoteIob::Begin {
                let speaker = labels.label_or_empty(&token.speaker_cluster);
                let _ = write!(line, " <quote speaker=\"{}\">{}", escape(speaker), text);
                quote_open = true;
            } else if mention.is_some() {
                line.push_str(&text);
            } else {
                line.push(' ');
                line.push_str(&text);
            }

            if mention_end == Some(token.global_index) {
                line.push_str("</mention>");
                mention_end = None;
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }
    }

    if quote_open {
        lines.push("</quote>".to_string());
    }
    lines.push("</text></doc>".to_string());

    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}

fn header(labels: &SpeakerLabels) -> String {
    let mut header = String::from("<doc><characters>");
    for character in labels.characters() {
        let name = escape(&character.name);
        let _ = write!(
            header,
            "<character aliases=\"{}\" id=\"{}\" name=\"{}\"></character>",
            escape(&character.aliases),
            character.id,
            name
        );
    }
    header.push_str("</characters><text>");
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Sentence, SentenceId, Token};

    fn table(sentences: &[&[(&str, &str, &str)]]) -> TokenTable {
        let mut global_index = 1;
        let sentences = sentences
            .iter()
            .enumerate()
            .map(|(s, tokens)| {
                let id = SentenceId::new(0, s);
                let tokens = tokens
                    .iter()
                    .enumerate()
                    .map(|(local_index, (text, speaker, iob))| {
                        let token = Token {
                            sentence: id,
                            local_index,
                            global_index,
                            text: text.to_string(),
                            speaker_cluster: speaker.to_string(),
                            quote: QuoteIob::from_tag(iob),
                        };
                        global_index += 1;
                        token
                    })
                    .collect();
                Sentence { id, tokens }
            })
            .collect();
        TokenTable { sentences }
    }

    fn labels() -> SpeakerLabels {
        let mut labels = SpeakerLabels::default();
        labels.insert("2", "Jan");
        labels
    }

    fn mention(start: usize, end: usize) -> BTreeMap<usize, ActiveMention> {
        [(
            start,
            ActiveMention {
                id: "7".to_string(),
                start,
                end,
                cluster: "2".to_string(),
            },
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_mention_is_glued_to_quote_speaker_line() {
        let table = table(&[&[
            ("Hij", "-", "O"),
            ("zei", "-", "O"),
            ("\"Hallo\"", "2", "B"),
        ]]);
        let doc = build_document(&table, &labels(), &mention(1, 1));
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(lines[0], XML_DECLARATION);
        assert_eq!(
            lines[1],
            "<doc><characters><character aliases=\"Jan\" id=\"0\" name=\"Jan\"></character></characters><text>"
        );
        assert_eq!(
            lines[2],
            " <mention speaker=\"Jan\">Hij</mention> zei <quote speaker=\"Jan\">\"Hallo\""
        );
        assert_eq!(lines[3], "</quote>");
        assert_eq!(lines[4], "</text></doc>");
    }

    #[test]
    fn test_quote_closing_at_sentence_start_lands_on_next_line() {
        let table = table(&[
            &[("Ja", "2", "B"), ("!", "2", "I")],
            &[("Goed", "-", "O"), (".", "-", "O")],
        ]);
        let doc = build_document(&table, &labels(), &BTreeMap::new());
        let lines: Vec<&str> = doc.lines().collect();

        assert_eq!(lines[2], " <quote speaker=\"Jan\">Ja !");
        assert_eq!(lines[3], "</quote> Goed .");
        assert_eq!(lines[4], "</text></doc>");
    }

    #[test]
    fn test_multi_token_mention_and_escaping() {
        let table = table(&[&[("de", "-", "O"), ("man", "-", "O"), ("&", "-", "O")]]);
        let doc = build_document(&table, &labels(), &mention(1, 2));
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[2], " <mention speaker=\"Jan\">de man</mention> &amp;");
    }

    #[test]
    fn test_adjacent_quotes_are_closed_and_reopened() {
        let table = table(&[&[("a", "2", "B"), ("b", "2", "B"), ("c", "-", "O")]]);
        let doc = build_document(&table, &labels(), &BTreeMap::new());
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(
            lines[2],
            " <quote speaker=\"Jan\">a</quote> <quote speaker=\"Jan\">b</quote> c"
        );
    }

    #[test]
    fn test_unknown_speaker_renders_empty_label() {
        let table = table(&[&[("a", "9", "B")]]);
        let doc = build_document(&table, &SpeakerLabels::default(), &BTreeMap::new());
        assert!(doc.contains("<doc><characters></characters><text>"));
        assert!(doc.contains(" <quote speaker=\"\">a"));
    }
}
