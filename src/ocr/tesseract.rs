//! Text recognition with the tesseract command-line tool.

use std::path::Path;
use std::process::Command;

use super::backend::{OcrError, TextRecognizer};
use super::tools::{run_tool, TESSERACT};
use crate::languages::CandidateLanguages;

/// Runs `tesseract <image> stdout -l eng+fra`.
#[derive(Debug, Clone, Default)]
pub struct TesseractRecognizer;

impl TesseractRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &Path, hints: &CandidateLanguages) -> Result<String, OcrError> {
        let stdout = run_tool(
            Command::new(TESSERACT)
                .arg(image)
                .arg("stdout")
                .args(["-l", &hints.tesseract_hint()]),
            TESSERACT,
        )?;
        Ok(String::from_utf8_lossy(&stdout).to_string())
    }
}
