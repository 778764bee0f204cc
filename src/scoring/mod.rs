//! Language confidence scoring.
//!
//! A scorer maps a page of text to a confidence in `[0, 1]` for each
//! candidate language.

mod lingua_backend;

use thiserror::Error;

use crate::store::ConfidenceMap;

pub use lingua_backend::LinguaScorer;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("language scoring failed: {0}")]
    Failed(String),
}

/// Scores text against the candidate languages it was built for.
///
/// Returned keys are a subset of the candidate codes.
pub trait LanguageScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<ConfidenceMap, ScoringError>;
}
