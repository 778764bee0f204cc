//! Error types shared across the detection pipeline.
//!
//! Each collaborator keeps its own error enum next to its code
//! (`OcrError`, `ScoringError`, `PersistenceError`, `LayoutError`,
//! `ReportError`). This module holds the configuration error and the
//! per-document `PipelineError` that wraps them with the stage that failed.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ocr::OcrError;
use crate::scoring::ScoringError;
use crate::store::PersistenceError;

/// Invalid configuration. Fatal before any document is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least {minimum} distinct candidate languages are required, got {given}")]
    TooFewLanguages { minimum: usize, given: usize },

    #[error("language {0} is listed more than once")]
    DuplicateLanguage(String),

    #[error("unknown or unsupported language code: {0}")]
    UnknownLanguage(String),

    #[error("input directory does not exist: {}", .0.display())]
    InputDirMissing(PathBuf),

    #[error(
        "{} is neither the input directory nor one of its ancestors ({})",
        relative_to.display(),
        input_dir.display()
    )]
    NotAnAncestor {
        relative_to: PathBuf,
        input_dir: PathBuf,
    },

    #[error("max pages must be at least 1, got {0}")]
    InvalidMaxPages(i64),

    #[error("parallel must be between 1 and {available}, got {requested}")]
    ParallelOutOfRange { requested: usize, available: usize },

    #[error("extension must not be empty")]
    EmptyExtension,

    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    ParseFile { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The step of document analysis that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Prepare,
    Metadata,
    Rasterize,
    Extract,
    Score,
    Persist,
    Average,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Metadata => "metadata",
            Stage::Rasterize => "rasterize",
            Stage::Extract => "extract",
            Stage::Score => "score",
            Stage::Persist => "persist",
            Stage::Average => "average",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying cause of a [`PipelineError`].
#[derive(Debug, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Analysis of one document failed. Never aborts the batch.
#[derive(Debug, Error)]
#[error("{stage} failed for {}: {source}", document.display())]
pub struct PipelineError {
    pub stage: Stage,
    pub document: PathBuf,
    #[source]
    pub source: StageFailure,
}

impl PipelineError {
    pub fn new(stage: Stage, document: &Path, source: impl Into<StageFailure>) -> Self {
        Self {
            stage,
            document: document.to_path_buf(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_names_stage_and_document() {
        let err = PipelineError::new(
            Stage::Extract,
            Path::new("/corpus/a.pdf"),
            OcrError::OcrFailed("tesseract failed: bad image".to_string()),
        );

        let message = err.to_string();
        assert!(message.starts_with("extract failed for /corpus/a.pdf"));
        assert!(message.contains("bad image"));
        assert!(matches!(err.source, StageFailure::Ocr(_)));
    }
}
