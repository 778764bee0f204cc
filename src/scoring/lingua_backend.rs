//! Scoring backed by the lingua n-gram models.

use lingua::{LanguageDetector, LanguageDetectorBuilder};

use super::{LanguageScorer, ScoringError};
use crate::languages::CandidateLanguages;
use crate::store::ConfidenceMap;

/// Lingua detector restricted to the candidate languages.
pub struct LinguaScorer {
    detector: LanguageDetector,
}

impl LinguaScorer {
    /// Build a detector for the candidates.
    ///
    /// Models are loaded up front so worker threads never race to load them.
    pub fn new(candidates: &CandidateLanguages) -> Self {
        let detector = LanguageDetectorBuilder::from_iso_codes_639_3(candidates.iso_codes())
            .with_preloaded_language_models()
            .build();
        Self { detector }
    }
}

impl LanguageScorer for LinguaScorer {
    fn score(&self, text: &str) -> Result<ConfidenceMap, ScoringError> {
        let values = self.detector.compute_language_confidence_values(text);
        if values.is_empty() {
            return Err(ScoringError::Failed(
                "detector returned no confidence values".to_string(),
            ));
        }
        Ok(values
            .into_iter()
            .map(|(language, confidence)| {
                (language.iso_code_639_3().to_string().to_uppercase(), confidence)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_only_candidates() {
        let candidates = CandidateLanguages::new(["eng", "fra"]).unwrap();
        let scorer = LinguaScorer::new(&candidates);

        let scores = scorer
            .score("The quick brown fox jumps over the lazy dog and keeps running")
            .unwrap();

        assert!(scores.keys().all(|code| candidates.contains(code)));
        let eng = scores.get("ENG").copied().unwrap_or(0.0);
        let fra = scores.get("FRA").copied().unwrap_or(0.0);
        assert!(eng > fra, "eng={eng} fra={fra}");
        assert!((0.0..=1.0).contains(&eng));
    }
}
