//! Capability traits for turning a document into page text.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::languages::CandidateLanguages;

/// Errors from rasterization and text recognition.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the first pages of a document as images.
///
/// Implementations write into `images_dir` and return the produced page
/// images in page order, never more than `max_pages`.
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        document: &Path,
        max_pages: u32,
        images_dir: &Path,
    ) -> Result<Vec<PathBuf>, OcrError>;
}

/// Extracts text from one page image.
///
/// The candidate languages are passed as recognition hints.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &Path, hints: &CandidateLanguages) -> Result<String, OcrError>;
}
