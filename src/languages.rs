//! Candidate language set.
//!
//! Languages are identified by upper-case ISO 639-3 codes (`ENG`, `FRA`).
//! The same codes key every confidence map on disk and in the report.

use std::str::FromStr;

use lingua::{IsoCode639_3, Language};

use crate::error::ConfigError;

/// A verdict needs something to choose between.
pub const MIN_CANDIDATES: usize = 2;

/// Ordered, distinct set of languages a document may be written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLanguages {
    codes: Vec<String>,
    iso_codes: Vec<IsoCode639_3>,
}

impl CandidateLanguages {
    /// Validate and normalize a list of language codes.
    ///
    /// Codes are case-insensitive on input and stored upper-case. Every code
    /// must be known to the scoring engine, appear once, and at least
    /// [`MIN_CANDIDATES`] must be given.
    pub fn new<I, S>(codes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        let mut iso_codes = Vec::new();

        for code in codes {
            let code = code.as_ref().trim().to_uppercase();
            if normalized.contains(&code) {
                return Err(ConfigError::DuplicateLanguage(code));
            }
            let iso = parse_iso_code(&code)
                .ok_or_else(|| ConfigError::UnknownLanguage(code.clone()))?;
            normalized.push(code);
            iso_codes.push(iso);
        }

        if normalized.len() < MIN_CANDIDATES {
            return Err(ConfigError::TooFewLanguages {
                minimum: MIN_CANDIDATES,
                given: normalized.len(),
            });
        }

        Ok(Self {
            codes: normalized,
            iso_codes,
        })
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn iso_codes(&self) -> &[IsoCode639_3] {
        &self.iso_codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Language argument for tesseract (`eng+fra`).
    pub fn tesseract_hint(&self) -> String {
        self.codes
            .iter()
            .map(|c| c.to_lowercase())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Upper-case English name for a language code (`"ENG"` -> `"ENGLISH"`).
pub fn display_name(code: &str) -> Option<String> {
    let iso = parse_iso_code(&code.trim().to_uppercase())?;
    Some(Language::from_iso_code_639_3(&iso).to_string().to_uppercase())
}

fn parse_iso_code(code: &str) -> Option<IsoCode639_3> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    IsoCode639_3::from_str(code).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_normalized_upper_case() {
        let languages = CandidateLanguages::new(["eng", " Fra "]).unwrap();
        assert_eq!(languages.codes(), &["ENG".to_string(), "FRA".to_string()]);
        assert_eq!(languages.len(), 2);
        assert!(languages.contains("FRA"));
        assert!(!languages.contains("fra"));
    }

    #[test]
    fn test_at_least_two_languages_required() {
        let err = CandidateLanguages::new(["eng"]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooFewLanguages { minimum: 2, given: 1 }
        ));

        let empty: [&str; 0] = [];
        assert!(CandidateLanguages::new(empty).is_err());
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = CandidateLanguages::new(["eng", "ENG"]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLanguage(code) if code == "ENG"));
    }

    #[test]
    fn test_unknown_codes_rejected() {
        for bad in ["foo", "en", "english", "e1g"] {
            let err = CandidateLanguages::new(["spa", bad]).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownLanguage(_)), "{bad}");
        }
    }

    #[test]
    fn test_spanish_and_greek_accepted() {
        let languages = CandidateLanguages::new(["spa", "ell"]).unwrap();
        assert_eq!(languages.tesseract_hint(), "spa+ell");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("ENG").as_deref(), Some("ENGLISH"));
        assert_eq!(display_name("fra").as_deref(), Some("FRENCH"));
        assert_eq!(display_name(" deu ").as_deref(), Some("GERMAN"));
        assert_eq!(display_name("XYZ"), None);
    }
}
