//! Rendering of evaluation results.

use std::fmt::Write;

use anyhow::Result;

use super::scorer::{Evaluation, Score};

fn fixed(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Precision, recall, F1 and the no-speaker count of one score
pub fn render_score(score: &Score) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Precision: {} / {} = {}",
        score.correct,
        score.attributed(),
        fixed(score.precision())
    );
    let _ = writeln!(
        out,
        "Recall: {} / {} = {}",
        score.correct,
        score.n,
        fixed(score.recall())
    );
    let _ = writeln!(out, "F score: {}", fixed(score.f1()));
    let _ = writeln!(out, "No speaker: {}", score.nospeaker);
    out
}

/// Plain-text report with mention and cluster sections
pub fn render_text(evaluation: &Evaluation) -> String {
    format!(
        "## Mention scores ##\n{}\n## Cluster scores ##\n{}",
        render_score(&evaluation.mention),
        render_score(&evaluation.cluster)
    )
}

/// JSON report including the derived metrics
pub fn render_json(evaluation: &Evaluation) -> Result<String> {
    let section = |score: &Score| {
        serde_json::json!({
            "correct": score.correct,
            "nospeaker": score.nospeaker,
            "n": score.n,
            "precision": score.precision(),
            "recall": score.recall(),
            "f1": score.f1(),
        })
    };
    let report = serde_json::json!({
        "mention": section(&evaluation.mention),
        "cluster": section(&evaluation.cluster),
        "missing_gold_mentions": evaluation.missing_gold_mentions,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}
