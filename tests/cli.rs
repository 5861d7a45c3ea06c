use std::fs;
use std::path::Path;

use assert_cmd::Command;
use geo_report::fonts;
use predicates::prelude::*;
use serde_json::Value;

fn bin(name: &str) -> Command {
    match name {
        "score_pdf" => assert_cmd::cargo::cargo_bin_cmd!("score_pdf"),
        "insights_pdf" => assert_cmd::cargo::cargo_bin_cmd!("insights_pdf"),
        "visibility_pdf" => assert_cmd::cargo::cargo_bin_cmd!("visibility_pdf"),
        _ => assert_cmd::cargo::cargo_bin_cmd!("charts"),
    }
}

fn last_json_line(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text.lines().last().expect("at least one line of output");
    serde_json::from_str(line).expect("last line is JSON")
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}

#[test]
fn wrong_arity_prints_usage() {
    bin("score_pdf")
        .arg("only-one.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage: score_pdf <input.json> <output.pdf>"));

    bin("visibility_pdf")
        .args(["a.json", "charts"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Usage: visibility_pdf <input.json> <charts_dir> <output.pdf>",
        ));

    bin("charts")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage: charts <input.json> <output_dir>"));
}

#[test]
fn missing_input_reports_a_load_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = bin("insights_pdf")
        .arg(dir.path().join("absent.json"))
        .arg(dir.path().join("out.pdf"))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let envelope = last_json_line(&output);
    assert_eq!(envelope["success"], Value::Bool(false));
    let message = envelope["error"].as_str().expect("error message");
    assert!(message.starts_with("Error loading JSON:"), "{}", message);
    assert!(!dir.path().join("out.pdf").exists());
}

#[test]
fn invalid_json_reports_a_load_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("broken.json");
    write(&input, "{ not json");
    bin("score_pdf")
        .arg(&input)
        .arg(dir.path().join("out.pdf"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""success":false"#))
        .stdout(predicate::str::contains("Error loading JSON"));
}

/// Runs `score_pdf` and checks the envelope against the fonts this machine has.
///
/// With a usable font family the PDF must be written; without one the payload
/// must still parse, so the failure has to be a render error.
fn assert_score_render(input: &Path, output: &Path) {
    let assert = bin("score_pdf").arg(input).arg(output).assert();
    if fonts::default_fonts_available() {
        let stdout = assert.code(0).get_output().stdout.clone();
        let envelope = last_json_line(&stdout);
        assert_eq!(envelope["success"], Value::Bool(true));
        assert_eq!(envelope["path"].as_str(), Some(output.display().to_string().as_str()));
        let bytes = fs::read(output).expect("pdf written");
        assert!(bytes.starts_with(b"%PDF"));
    } else {
        let stdout = assert.code(1).get_output().stdout.clone();
        let envelope = last_json_line(&stdout);
        assert_eq!(envelope["success"], Value::Bool(false));
        let message = envelope["error"].as_str().expect("error message");
        assert!(!message.starts_with("Error loading JSON"), "{}", message);
        assert!(!output.exists());
    }
}

#[test]
fn minimal_score_payload_renders() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("score.json");
    write(&input, r#"{"totalScore":82,"grade":"A","pages":[],"categories":{}}"#);
    assert_score_render(&input, &dir.path().join("score.pdf"));
}

#[test]
fn unordered_categories_and_null_entries_render() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("score.json");
    write(
        &input,
        r#"{
            "url": "https://example.com",
            "totalScore": 64,
            "grade": "C",
            "categories": {
                "url": {"score": 8, "maxScore": 10, "percentage": 80},
                "content": {"score": 12, "maxScore": 30, "percentage": 40, "items": [null]},
                "meta": null
            },
            "pages": [null, {"url": "https://example.com/"}, {"url": "https://example.com/blog/a"}],
            "recommendations": [null, {"priority": "high", "category": "content", "issue": "Add FAQ"}]
        }"#,
    );
    assert_score_render(&input, &dir.path().join("score.pdf"));
}

#[test]
fn visibility_renders_without_charts() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping visibility_renders_without_charts: no usable font family found.");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("visibility.json");
    let output = dir.path().join("visibility.pdf");
    write(
        &input,
        r#"{"type": "weekly", "period": "2024-W05", "metrics": {"citationRate": 41, "citationRateChange": -2.5}}"#,
    );

    bin("visibility_pdf")
        .arg(&input)
        .arg(dir.path().join("no-charts-here"))
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":true"#));
    assert!(output.is_file());
}

#[test]
fn charts_are_written_with_sample_fallback() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("charts.json");
    let output_dir = dir.path().join("nested").join("charts");
    write(
        &input,
        r#"{"enginePerformance": [{"engine": "gpt", "citationRate": 61}, {"engine": "claude", "citationRate": 22}]}"#,
    );

    let stdout = bin("charts")
        .arg(&input)
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created: citation_trend.png"))
        .stdout(predicate::str::contains("Created: metrics_summary.png"))
        .get_output()
        .stdout
        .clone();

    let envelope = last_json_line(&stdout);
    let charts = envelope["charts"].as_array().expect("chart list");
    assert_eq!(charts.len(), 5);
    for name in [
        "citation_trend.png",
        "engine_performance.png",
        "category_distribution.png",
        "top_queries.png",
        "metrics_summary.png",
    ] {
        let path = output_dir.join(name);
        assert!(path.is_file(), "{} missing", name);
        assert!(charts.iter().any(|entry| entry.as_str() == Some(path.display().to_string().as_str())));
    }
}

#[test]
fn broken_chart_is_reported_and_skipped() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("charts.json");
    write(
        &input,
        r#"{"categoryDistribution": {"categories": ["a"], "values": [0]}}"#,
    );

    let stdout = bin("charts")
        .arg(&input)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Error creating category_distribution:"))
        .get_output()
        .stdout
        .clone();

    let envelope = last_json_line(&stdout);
    assert_eq!(envelope["charts"].as_array().map(Vec::len), Some(4));
    assert!(!dir.path().join("category_distribution.png").exists());
}

#[test]
fn charts_abort_on_unreadable_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    bin("charts")
        .arg(dir.path().join("absent.json"))
        .arg(dir.path().join("out"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""success":false"#));
}
