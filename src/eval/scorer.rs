//! Matching of system attributions against gold quotes.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::gold::{GoldStandard, SystemOutput};
use super::EvalError;

/// Counts behind precision, recall and F1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub correct: usize,
    /// Scored quotes the system left without a speaker
    pub nospeaker: usize,
    /// Scored quotes
    pub n: usize,
}

impl Score {
    /// Quotes the system attributed to some speaker
    pub fn attributed(&self) -> usize {
        self.n - self.nospeaker
    }

    pub fn precision(&self) -> Option<f64> {
        ratio(self.correct, self.attributed())
    }

    pub fn recall(&self) -> Option<f64> {
        ratio(self.correct, self.n)
    }

    pub fn f1(&self) -> Option<f64> {
        let (p, r) = (self.precision()?, self.recall()?);
        if p + r == 0.0 {
            Some(0.0)
        } else {
            Some(2.0 * p * r / (p + r))
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Mention-level and cluster-level scores of one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub mention: Score,
    pub cluster: Score,
    /// Gold speaker mentions missing from the gold mentions table
    pub missing_gold_mentions: usize,
}

/// Score every system quote that starts where a speaker-linked gold quote starts
///
/// When the gold mention has no exact-offset entry in the gold mentions
/// table, the mention-level decision is reused as the cluster-level one.
/// This is an approximation, not a verified cluster match.
pub fn evaluate(
    gold: &GoldStandard,
    system: &SystemOutput,
    verbose: bool,
) -> Result<Evaluation, EvalError> {
    let mut eval = Evaluation::default();
    let mut cluster_spans: HashMap<&str, HashSet<(usize, usize)>> = HashMap::new();

    for row in &system.quotes {
        let Some(gold_quote) = gold.quotes.get(&row.start) else {
            continue;
        };
        let Some(gold_mention) = gold_quote.mention else {
            continue;
        };

        if verbose && gold_quote.text != row.text {
            tracing::warn!(
                gold = %gold_quote.text,
                detected = %row.text,
                start = row.start,
                "Detected quote text differs from gold"
            );
        }

        eval.mention.n += 1;
        eval.cluster.n += 1;

        let Some(mention_id) = row.speaker_mention() else {
            eval.mention.nospeaker += 1;
            eval.cluster.nospeaker += 1;
            continue;
        };

        let system_span = system.mention_span(mention_id)?;
        let mention_correct = system_span == (gold_mention.start, gold_mention.end);
        if mention_correct {
            eval.mention.correct += 1;
        }

        let cluster_correct = match gold.cluster_of(gold_mention) {
            Some(cluster_id) => {
                let spans = match cluster_spans.entry(cluster_id) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(gold.cluster_spans(cluster_id)?),
                };
                spans.contains(&system_span)
            }
            None => {
                tracing::warn!(
                    start = gold_mention.start,
                    end = gold_mention.end,
                    "Gold mention not in gold mentions table, using mention match for cluster score"
                );
                eval.missing_gold_mentions += 1;
                mention_correct
            }
        };
        if cluster_correct {
            eval.cluster.correct += 1;
        }
    }

    Ok(eval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::gold::{GoldMention, GoldQuote};
    use crate::tables::{ClusterRow, MentionRow, QuoteRow};

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("score should be defined");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_score_closed_form() {
        let score = Score {
            correct: 6,
            nospeaker: 2,
            n: 10,
        };
        let p = 6.0 / 8.0;
        let r = 6.0 / 10.0;
        assert_close(score.precision(), p);
        assert_close(score.recall(), r);
        assert_close(score.f1(), 2.0 * p * r / (p + r));
    }

    #[test]
    fn test_score_undefined_denominators() {
        let empty = Score::default();
        assert_eq!(empty.precision(), None);
        assert_eq!(empty.recall(), None);
        assert_eq!(empty.f1(), None);

        let all_nospeaker = Score {
            correct: 0,
            nospeaker: 3,
            n: 3,
        };
        assert_eq!(all_nospeaker.precision(), None);
        assert_close(all_nospeaker.recall(), 0.0);

        let none_correct = Score {
            correct: 0,
            nospeaker: 0,
            n: 4,
        };
        assert_close(none_correct.f1(), 0.0);
    }

    fn mention(id: &str, start: usize, end: usize, cluster: &str) -> MentionRow {
        MentionRow {
            id: id.to_string(),
            start,
            end,
            cluster: cluster.to_string(),
        }
    }

    fn cluster(id: &str, label: &str, mentions: &str) -> ClusterRow {
        ClusterRow {
            id: id.to_string(),
            label: label.to_string(),
            mentions: mentions.to_string(),
        }
    }

    fn quote_row(start: usize, speakermention: &str) -> QuoteRow {
        QuoteRow {
            start,
            text: String::new(),
            speakermention: speakermention.to_string(),
            speakercluster: "-".to_string(),
        }
    }

    fn gold_quote(start: usize, mention: Option<(usize, usize)>) -> (usize, GoldQuote) {
        (
            start,
            GoldQuote {
                text: String::new(),
                connection: None,
                global_begin: start,
                begin: 0,
                end: 0,
                mention: mention.map(|(start, end)| GoldMention { start, end }),
            },
        )
    }

    #[test]
    fn test_evaluate_mention_and_cluster_levels() {
        let gold = GoldStandard::new(
            [
                gold_quote(10, Some((1, 1))),
                gold_quote(20, Some((1, 1))),
                gold_quote(30, Some((5, 6))),
                gold_quote(40, Some((50, 50))),
                gold_quote(60, None),
            ]
            .into_iter()
            .collect(),
            vec![
                mention("1", 1, 1, "c1"),
                mention("2", 8, 8, "c1"),
                mention("3", 5, 6, "c2"),
            ],
            vec![
                cluster("c1", "Jan", "1,2"),
                cluster("c2", "Marie", "3"),
            ],
        );
        let system = SystemOutput::new(
            vec![
                // exact mention
                quote_row(10, "a"),
                // other mention of the same gold cluster
                quote_row(20, "b"),
                // no speaker
                quote_row(30, "-"),
                // gold mention missing from gold table, wrong system mention
                quote_row(40, "b"),
                // gold quote without linked mention: not scored
                quote_row(60, "a"),
                // no gold quote at this start: not scored
                quote_row(99, "a"),
            ],
            vec![mention("a", 1, 1, "x"), mention("b", 8, 8, "x")],
        );

        let eval = evaluate(&gold, &system, false).unwrap();
        assert_eq!(
            eval.mention,
            Score {
                correct: 1,
                nospeaker: 1,
                n: 4
            }
        );
        assert_eq!(
            eval.cluster,
            Score {
                correct: 2,
                nospeaker: 1,
                n: 4
            }
        );
        assert_eq!(eval.missing_gold_mentions, 1);
    }

    #[test]
    fn test_unknown_system_mention_is_an_error() {
        let gold = GoldStandard::new(
            [gold_quote(10, Some((1, 1)))].into_iter().collect(),
            vec![],
            vec![],
        );
        let system = SystemOutput::new(vec![quote_row(10, "zz")], vec![]);
        let err = evaluate(&gold, &system, false).unwrap_err();
        assert!(matches!(err, EvalError::MissingSystemMention(id) if id == "zz"));
    }

    #[test]
    fn test_evaluate_large_cluster() {
        // One protagonist cluster holding every third of 20k mentions
        let mentions: Vec<MentionRow> = (0..20_000)
            .map(|i| {
                let cluster = if i % 3 == 0 { "hero" } else { "other" };
                mention(&i.to_string(), i * 2, i * 2, cluster)
            })
            .collect();
        let members = |name: &str| {
            mentions
                .iter()
                .filter(|m| m.cluster == name)
                .map(|m| m.id.as_str())
                .collect::<Vec<_>>()
                .join(",")
        };
        let clusters = vec![
            cluster("hero", "Jan", &members("hero")),
            cluster("other", "Marie", &members("other")),
        ];

        // 2000 quotes, each linked to a hero mention; the system picks the
        // exact mention for even quotes and another hero mention for odd ones
        let quotes = (0..2_000).map(|q| gold_quote(100_000 + q, Some((q * 6, q * 6))));
        let system_quotes = (0..2_000)
            .map(|q| quote_row(100_000 + q, &format!("s{q}")))
            .collect();
        let system_mentions = (0..2_000)
            .map(|q| {
                let span = if q % 2 == 0 { q * 6 } else { q * 6 + 6 };
                mention(&format!("s{q}"), span, span, "x")
            })
            .collect();

        let gold = GoldStandard::new(quotes.collect(), mentions.clone(), clusters);
        let system = SystemOutput::new(system_quotes, system_mentions);
        let eval = evaluate(&gold, &system, false).unwrap();

        assert_eq!(eval.mention.n, 2_000);
        assert_eq!(eval.mention.correct, 1_000);
        assert_eq!(eval.cluster.correct, 2_000);
        assert_eq!(eval.missing_gold_mentions, 0);
    }
}
