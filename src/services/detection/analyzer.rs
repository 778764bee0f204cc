//! Per-document analysis pipeline.
//!
//! rasterize -> recognize each page -> score each page -> average -> verdict.
//! Every intermediate result is written to the document's output directory,
//! so a later run can pick up from the images or the page records.

use std::path::Path;
use std::sync::Arc;

use crate::error::{PipelineError, Stage};
use crate::languages::CandidateLanguages;
use crate::ocr::{Rasterizer, TextRecognizer};
use crate::scoring::LanguageScorer;
use crate::store::{
    self, append_page_text, compute_document_averages, record_page_confidence, verdict,
    write_averages, write_meta, ConfidenceMap, DocumentMeta, PersistenceError,
};

use super::types::Document;

/// Explicit configuration for a [`DocumentAnalyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub languages: CandidateLanguages,
    pub max_pages: u32,
    /// Reuse page images from an earlier run instead of rasterizing.
    pub skip_images: bool,
    /// Reuse page records from an earlier run instead of recognizing text.
    pub skip_ocr: bool,
}

/// Runs the detection pipeline for one document at a time.
///
/// Holds no per-document state; one analyzer is shared by every worker.
pub struct DocumentAnalyzer {
    settings: AnalyzerSettings,
    rasterizer: Arc<dyn Rasterizer>,
    recognizer: Arc<dyn TextRecognizer>,
    scorer: Arc<dyn LanguageScorer>,
}

impl DocumentAnalyzer {
    pub fn new(
        settings: AnalyzerSettings,
        rasterizer: Arc<dyn Rasterizer>,
        recognizer: Arc<dyn TextRecognizer>,
        scorer: Arc<dyn LanguageScorer>,
    ) -> Self {
        Self {
            settings,
            rasterizer,
            recognizer,
            scorer,
        }
    }

    /// Analyse one document and return the language code of its verdict.
    ///
    /// Blocking; callers on an async runtime should use `spawn_blocking`.
    pub fn analyze(&self, document: &Document) -> Result<String, PipelineError> {
        let source = document.source.as_path();
        let dir = &document.output;
        let settings = &self.settings;

        dir.create_dirs()
            .map_err(|e| PipelineError::new(Stage::Prepare, source, e))?;

        let meta = DocumentMeta::new(source, dir.path()).map_err(|e| {
            PipelineError::new(
                Stage::Metadata,
                source,
                PersistenceError::Write {
                    path: dir.meta_file(),
                    source: e,
                },
            )
        })?;
        write_meta(dir, &meta).map_err(|e| PipelineError::new(Stage::Metadata, source, e))?;

        if !settings.skip_images {
            let pages = self
                .rasterizer
                .rasterize(source, settings.max_pages, &dir.images_dir())
                .map_err(|e| PipelineError::new(Stage::Rasterize, source, e))?;
            tracing::debug!(document = %source.display(), pages = pages.len(), "pages rasterized");
        }

        if !settings.skip_ocr {
            self.process_pages(document)?;
        }

        let averages = compute_document_averages(dir, &settings.languages, settings.max_pages)
            .map_err(|e| PipelineError::new(Stage::Average, source, e))?;
        write_averages(dir, &averages).map_err(|e| PipelineError::new(Stage::Persist, source, e))?;

        let lang = verdict(&averages).ok_or_else(|| {
            PipelineError::new(
                Stage::Average,
                source,
                PersistenceError::EmptyMap {
                    path: dir.avgs_file(),
                },
            )
        })?;

        tracing::info!(document = %source.display(), lang, "language detected");
        Ok(lang.to_string())
    }

    /// Recognize and score every page image, in page order.
    fn process_pages(&self, document: &Document) -> Result<usize, PipelineError> {
        let source = document.source.as_path();
        let dir = &document.output;
        let languages = &self.settings.languages;

        let images = dir
            .page_images(self.settings.max_pages)
            .map_err(|e| PipelineError::new(Stage::Extract, source, e))?;

        for image in &images {
            let stem = page_stem(image);

            let text = self
                .recognizer
                .recognize(image, languages)
                .map_err(|e| PipelineError::new(Stage::Extract, source, e))?;
            append_page_text(dir, &stem, &text)
                .map_err(|e| PipelineError::new(Stage::Persist, source, e))?;

            let scores = self
                .scorer
                .score(&text)
                .map_err(|e| PipelineError::new(Stage::Score, source, e))?;
            let scores = self.restrict_to_candidates(scores);
            record_page_confidence(dir, &stem, &scores)
                .map_err(|e| PipelineError::new(Stage::Persist, source, e))?;

            tracing::debug!(document = %source.display(), page = %stem, "page scored");
        }

        Ok(images.len())
    }

    fn restrict_to_candidates(&self, mut scores: ConfidenceMap) -> ConfidenceMap {
        let languages = &self.settings.languages;
        scores.retain(|code, _| {
            let known = languages.contains(code);
            if !known {
                tracing::debug!(code = %code, "dropping score for non-candidate language");
            }
            known
        });
        scores
    }
}

fn page_stem(image: &Path) -> String {
    image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| store::PAGE_PREFIX.to_string())
}
