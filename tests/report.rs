//! Reports rebuilt from detection output.

mod common;

use std::sync::Arc;

use common::*;
use pdflang::services::{render, DetectionService, ReportEntry, ReportError, ReportService};

async fn detect_corpus(corpus: &Corpus, scorer: FakeScorer) {
    let rasterizer = Arc::new(FakeRasterizer::new(2));
    let recognizer = Arc::new(FakeRecognizer::default());
    let service = DetectionService::new(
        analyzer(settings(5), &rasterizer, &recognizer, scorer),
        false,
    );
    let (result, _) = run(&service, corpus.documents(), 2).await;
    assert_eq!(result.failed, 0);
}

fn mixed_scorer() -> FakeScorer {
    FakeScorer::default()
        .with("english/page-1", &[("ENG", 0.9), ("FRA", 0.1)])
        .with("english/page-2", &[("ENG", 0.7), ("FRA", 0.3)])
        .with("french/page-1", &[("ENG", 0.2), ("FRA", 0.8)])
        .with("french/page-2", &[("ENG", 0.4), ("FRA", 0.6)])
}

#[tokio::test]
async fn test_report_lists_each_analysed_document() {
    let corpus = Corpus::new(&["english.pdf", "sub/french.pdf"]);
    detect_corpus(&corpus, mixed_scorer()).await;

    let assembly = ReportService::new(&corpus.output).assemble().unwrap();
    assert_eq!(assembly.candidates, 2);
    assert_eq!(
        assembly.entries,
        vec![
            ReportEntry {
                lang: "ENG".to_string(),
                lang_name: "ENGLISH".to_string(),
                input_file: corpus.input.join("english.pdf").display().to_string(),
                output_dir: corpus.output.join("english").display().to_string(),
            },
            ReportEntry {
                lang: "FRA".to_string(),
                lang_name: "FRENCH".to_string(),
                input_file: corpus.input.join("sub/french.pdf").display().to_string(),
                output_dir: corpus.output.join("sub/french").display().to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_report_written_as_json_and_yaml() {
    let corpus = Corpus::new(&["english.pdf"]);
    detect_corpus(&corpus, mixed_scorer()).await;

    let service = ReportService::new(&corpus.output);
    let assembly = service.assemble().unwrap();

    let json_path = corpus.output.join("report.json");
    service
        .write(&json_path, &render(&assembly.entries, "json").unwrap())
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[0]["lang"], "ENG");
    assert_eq!(json[0]["lang_name"], "ENGLISH");

    let yaml = render(&assembly.entries, "yaml").unwrap();
    let parsed: Vec<ReportEntry> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, assembly.entries);
}

#[tokio::test]
async fn test_unsupported_format_fails_after_assembly() {
    let corpus = Corpus::new(&["english.pdf"]);
    detect_corpus(&corpus, mixed_scorer()).await;

    let assembly = ReportService::new(&corpus.output).assemble().unwrap();
    assert_eq!(assembly.entries.len(), 1);
    let err = render(&assembly.entries, "csv").unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_report_ignores_partial_output() {
    let corpus = Corpus::new(&["english.pdf", "french.pdf"]);
    detect_corpus(&corpus, mixed_scorer()).await;

    // Simulate a run interrupted before the verdict was written.
    let french = corpus.document("french.pdf");
    std::fs::remove_file(french.output.avgs_file()).unwrap();

    let assembly = ReportService::new(&corpus.output).assemble().unwrap();
    assert_eq!(assembly.candidates, 2);
    assert_eq!(assembly.entries.len(), 1);
    assert_eq!(assembly.entries[0].lang, "ENG");
}
