//! Evaluation Tests
//!
//! Writes a gold document, gold tables and system output to disk and
//! scores them the way the `evaluate` command does.

use std::fmt::Write as _;
use std::path::Path;

use quote_align::eval::{evaluate, render_json, render_text, GoldStandard, SystemOutput};
use quote_align::EvalError;
use tempfile::TempDir;

/// Ten quotes at global tokens 10, 20, ..., 100, each linked to a
/// single-token speaker mention two tokens earlier
fn gold_document() -> String {
    let mut body = String::new();
    for i in 1..=10 {
        let mention = i * 10 - 2;
        writeln!(
            body,
            " <mention id=\"m{i}\" speaker=\"Jan\" parno=\"0\" sentno=\"{i}\" begin=\"0\" end=\"0\" ttokenno=\"{mention}\">hij</mention> zei \
<quote connection=\"m{i}\" speaker=\"Jan\" parno=\"0\" sentno=\"{i}\" begin=\"2\" end=\"2\" ttokenno=\"{}\">\"Ja\"</quote>",
            mention + 2
        )
        .unwrap();
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<doc><characters><character aliases=\"Jan\" id=\"0\" name=\"Jan\"/></characters><text>\n{body}</text></doc>\n"
    )
}

fn write_gold(dir: &Path) {
    std::fs::write(dir.join("novel.xml"), gold_document()).unwrap();

    let mut mentions = String::from("id\tstart\tend\tcluster\n");
    let mut members = Vec::new();
    for i in 1..=10 {
        let start = i * 10 - 2;
        writeln!(mentions, "{i}\t{start}\t{start}\t1").unwrap();
        members.push(i.to_string());
    }
    writeln!(mentions, "11\t500\t500\t2").unwrap();
    std::fs::write(dir.join("gold.mentions.tsv"), mentions).unwrap();

    let clusters = format!(
        "id\tlabel\tmentions\n1\tJan\t{}\n2\tPiet\t11\n",
        members.join(",")
    );
    std::fs::write(dir.join("gold.clusters.tsv"), clusters).unwrap();
}

/// Quotes 1-6 exact, 7 points at another member of the right cluster,
/// 8 points at the wrong cluster, 9-10 have no speaker
fn write_system(dir: &Path) {
    let mut quotes = String::from("start\tend\ttext\tspeakermention\tspeakercluster\n");
    let mut mentions = String::from("id\tstart\tend\tcluster\n");
    for i in 1..=10 {
        let start = i * 10;
        let (mention, cluster) = match i {
            1..=8 => (format!("s{i}"), "7".to_string()),
            _ => ("-".to_string(), "-".to_string()),
        };
        writeln!(quotes, "{start}\t{start}\t\"Ja\"\t{mention}\t{cluster}").unwrap();

        let span = match i {
            1..=6 => Some(start - 2),
            7 => Some(8),
            8 => Some(500),
            _ => None,
        };
        if let Some(span) = span {
            writeln!(mentions, "s{i}\t{span}\t{span}\t7").unwrap();
        }
    }
    // Detected quote with no gold counterpart
    writeln!(quotes, "300\t302\t\"Nee\"\t-\t-").unwrap();

    std::fs::write(dir.join("system.quotes.tsv"), quotes).unwrap();
    std::fs::write(dir.join("system.mentions.tsv"), mentions).unwrap();
}

fn prefix(dir: &Path, name: &str) -> String {
    dir.join(name).to_string_lossy().to_string()
}

#[test]
fn test_evaluate_from_files() {
    let temp = TempDir::new().unwrap();
    write_gold(temp.path());
    write_system(temp.path());

    let gold = GoldStandard::load(&temp.path().join("novel.xml"), &prefix(temp.path(), "gold"))
        .unwrap();
    let system = SystemOutput::load(&prefix(temp.path(), "system")).unwrap();
    let evaluation = evaluate(&gold, &system, true).unwrap();

    assert_eq!(evaluation.mention.n, 10);
    assert_eq!(evaluation.mention.nospeaker, 2);
    assert_eq!(evaluation.mention.correct, 6);
    assert_eq!(evaluation.cluster.n, 10);
    assert_eq!(evaluation.cluster.correct, 7);
    assert_eq!(evaluation.missing_gold_mentions, 0);

    let precision = evaluation.mention.precision().unwrap();
    let recall = evaluation.mention.recall().unwrap();
    assert!((precision - 0.75).abs() < 1e-9);
    assert!((recall - 0.6).abs() < 1e-9);

    let text = render_text(&evaluation);
    assert!(text.contains("6 / 8"));
    assert!(text.contains("7 / 10"));

    let json: serde_json::Value = serde_json::from_str(&render_json(&evaluation).unwrap()).unwrap();
    assert!(json.is_object());
}

#[test]
fn test_unknown_system_mention_is_an_error() {
    let temp = TempDir::new().unwrap();
    write_gold(temp.path());
    write_system(temp.path());
    std::fs::write(
        temp.path().join("system.mentions.tsv"),
        "id\tstart\tend\tcluster\ns1\t8\t8\t7\n",
    )
    .unwrap();

    let gold = GoldStandard::load(&temp.path().join("novel.xml"), &prefix(temp.path(), "gold"))
        .unwrap();
    let system = SystemOutput::load(&prefix(temp.path(), "system")).unwrap();
    let err = evaluate(&gold, &system, false).unwrap_err();
    assert!(matches!(err, EvalError::MissingSystemMention(ref id) if id == "s2"));
}

#[test]
fn test_missing_gold_table_fails_to_load() {
    let temp = TempDir::new().unwrap();
    write_gold(temp.path());
    std::fs::remove_file(temp.path().join("gold.clusters.tsv")).unwrap();

    let err = GoldStandard::load(&temp.path().join("novel.xml"), &prefix(temp.path(), "gold"))
        .unwrap_err();
    assert!(matches!(err, EvalError::Table(_)));
}
