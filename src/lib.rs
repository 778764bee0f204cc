//! pdflang - language detection for PDF corpora.
//!
//! Each document is rasterized, its pages are read with OCR and scored
//! against a fixed set of candidate languages, and the page scores are
//! averaged into a verdict. All state lives in a per-document output
//! directory so runs can be resumed and reports rebuilt at any time.

pub mod config;
pub mod error;
pub mod languages;
pub mod ocr;
pub mod scoring;
pub mod services;
pub mod store;

pub use error::{ConfigError, PipelineError, Stage, StageFailure};
pub use languages::CandidateLanguages;
