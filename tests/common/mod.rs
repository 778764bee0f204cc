//! Fake collaborators and corpus fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use pdflang::languages::CandidateLanguages;
use pdflang::ocr::{OcrError, Rasterizer, TextRecognizer};
use pdflang::scoring::{LanguageScorer, ScoringError};
use pdflang::services::{
    enumerate_documents, AnalyzerSettings, DetectionEvent, DetectionResult, DetectionService,
    Document, DocumentAnalyzer,
};
use pdflang::store::{ConfidenceMap, OutputLayout};

pub fn scores(entries: &[(&str, f64)]) -> ConfidenceMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn eng_fra() -> CandidateLanguages {
    CandidateLanguages::new(["eng", "fra"]).unwrap()
}

pub fn settings(max_pages: u32) -> AnalyzerSettings {
    AnalyzerSettings {
        languages: eng_fra(),
        max_pages,
        skip_images: false,
        skip_ocr: false,
    }
}

/// Writes `pages` empty page images, honoring the page cap.
pub struct FakeRasterizer {
    pub pages: usize,
    pub calls: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub delay: Duration,
}

impl FakeRasterizer {
    pub fn new(pages: usize) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn slow(pages: usize, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(pages)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(
        &self,
        _document: &Path,
        max_pages: u32,
        images_dir: &Path,
    ) -> Result<Vec<PathBuf>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);

        let mut pages = Vec::new();
        for page in 1..=self.pages.min(max_pages as usize) {
            let path = images_dir.join(format!("page-{}.jpg", page));
            std::fs::write(&path, b"jpeg")?;
            pages.push(path);
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(pages)
    }
}

/// Returns `<document>/<page>` as the page text, e.g. `a/page-1`.
///
/// Fails for documents whose name contains `fail_on`, panics for `panic_on`.
#[derive(Default)]
pub struct FakeRecognizer {
    pub fail_on: Option<String>,
    pub panic_on: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn panicking_on(name: &str) -> Self {
        Self {
            panic_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, image: &Path, _hints: &CandidateLanguages) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let document = image
            .parent()
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let page = image.file_stem().unwrap().to_string_lossy().into_owned();

        if self.panic_on.as_deref() == Some(document.as_str()) {
            panic!("recognizer exploded on {}", document);
        }
        if self.fail_on.as_deref() == Some(document.as_str()) {
            return Err(OcrError::OcrFailed(format!("unreadable image {}", image.display())));
        }
        Ok(format!("{}/{}", document, page))
    }
}

/// Looks up page text in a table; unknown text scores evenly.
#[derive(Default)]
pub struct FakeScorer {
    pub table: HashMap<String, ConfidenceMap>,
}

impl FakeScorer {
    pub fn with(mut self, text: &str, entries: &[(&str, f64)]) -> Self {
        self.table.insert(text.to_string(), scores(entries));
        self
    }
}

impl LanguageScorer for FakeScorer {
    fn score(&self, text: &str) -> Result<ConfidenceMap, ScoringError> {
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| scores(&[("ENG", 0.5), ("FRA", 0.5)])))
    }
}

/// Input and output directories in a scratch location.
pub struct Corpus {
    _temp: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Corpus {
    pub fn new(files: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("corpus");
        let output = temp.path().join("out");
        for file in files {
            let path = input.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, b"%PDF-1.4").unwrap();
        }
        std::fs::create_dir_all(&input).unwrap();
        Self {
            _temp: temp,
            input,
            output,
        }
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output, &self.input)
    }

    pub fn documents(&self) -> Vec<Document> {
        enumerate_documents(&self.input, "pdf", &self.layout()).unwrap()
    }

    pub fn document(&self, name: &str) -> Document {
        self.documents()
            .into_iter()
            .find(|d| d.source.ends_with(name))
            .unwrap()
    }
}

pub fn analyzer(
    settings: AnalyzerSettings,
    rasterizer: &Arc<FakeRasterizer>,
    recognizer: &Arc<FakeRecognizer>,
    scorer: FakeScorer,
) -> DocumentAnalyzer {
    DocumentAnalyzer::new(
        settings,
        rasterizer.clone(),
        recognizer.clone(),
        Arc::new(scorer),
    )
}

/// Run a batch and collect every event it emitted.
pub async fn run(
    service: &DetectionService,
    documents: Vec<Document>,
    workers: usize,
) -> (DetectionResult, Vec<DetectionEvent>) {
    let (event_tx, mut event_rx) = mpsc::channel(4);
    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = event_rx.recv().await {
            events.push(event);
        }
        events
    });

    let result = service.detect(documents, workers, event_tx).await;
    let events = collector.await.unwrap();
    (result, events)
}

pub fn outcomes(events: &[DetectionEvent]) -> Vec<&DetectionEvent> {
    events.iter().filter(|e| e.is_outcome()).collect()
}
