//! Detection service types and events.

use std::path::{Path, PathBuf};

use crate::store::DocumentDir;

/// A source document paired with the directory it is analysed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub source: PathBuf,
    pub output: DocumentDir,
}

/// Events emitted while documents are processed.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionEvent {
    /// Analysis started for a document
    Started { worker_id: usize, document: PathBuf },
    /// Document already had a verdict and was left alone
    Skipped { worker_id: usize, document: PathBuf },
    /// Analysis finished with a verdict
    Completed {
        worker_id: usize,
        document: PathBuf,
        lang: String,
    },
    /// Analysis failed; the batch continues
    Failed {
        worker_id: usize,
        document: PathBuf,
        error: String,
    },
}

impl DetectionEvent {
    pub fn document(&self) -> &Path {
        match self {
            DetectionEvent::Started { document, .. }
            | DetectionEvent::Skipped { document, .. }
            | DetectionEvent::Completed { document, .. }
            | DetectionEvent::Failed { document, .. } => document,
        }
    }

    /// Skipped, Completed and Failed are final; each document gets exactly one.
    pub fn is_outcome(&self) -> bool {
        !matches!(self, DetectionEvent::Started { .. })
    }
}

/// Totals for one detection run.
#[derive(Debug, Default)]
pub struct DetectionResult {
    pub discovered: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Failed documents with their error messages, in no particular order.
    pub failures: Vec<(PathBuf, String)>,
}

impl DetectionResult {
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}
