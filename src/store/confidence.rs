//! Page confidence records and document averages.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{read_json, write_json, write_json_atomic, DocumentDir, PersistenceError};
use crate::languages::CandidateLanguages;

/// Language code to confidence. Iterates in code order.
pub type ConfidenceMap = BTreeMap<String, f64>;

/// Persist the scores for one page to `langs/<page_stem>.json`.
pub fn record_page_confidence(
    dir: &DocumentDir,
    page_stem: &str,
    confidences: &ConfidenceMap,
) -> Result<PathBuf, PersistenceError> {
    let path = dir.record_file(page_stem);
    if confidences.is_empty() {
        return Err(PersistenceError::EmptyMap { path });
    }
    write_json(&path, confidences)?;
    Ok(path)
}

pub fn read_page_confidence(path: &Path) -> Result<ConfidenceMap, PersistenceError> {
    read_json(path)
}

/// Fold one more sample into a mean over `prior_count` samples.
pub fn running_average(prior_average: f64, prior_count: usize, sample: f64) -> f64 {
    let count = prior_count as f64;
    (prior_average * count + sample) / (count + 1.0)
}

/// Average page maps per candidate.
///
/// Every candidate starts at 0 and a page that lacks a candidate contributes
/// 0 for it. Codes outside the candidate set are ignored.
pub fn fold_averages<'a, I>(candidates: &CandidateLanguages, pages: I) -> ConfidenceMap
where
    I: IntoIterator<Item = &'a ConfidenceMap>,
{
    let mut averages: ConfidenceMap = candidates
        .iter()
        .map(|code| (code.to_string(), 0.0))
        .collect();

    for (count, page) in pages.into_iter().enumerate() {
        for (code, average) in averages.iter_mut() {
            let sample = page.get(code).copied().unwrap_or(0.0);
            *average = running_average(*average, count, sample);
        }
    }
    averages
}

/// Recompute a document's averages from its persisted page records.
pub fn compute_document_averages(
    dir: &DocumentDir,
    candidates: &CandidateLanguages,
    max_pages: u32,
) -> Result<ConfidenceMap, PersistenceError> {
    let pages = dir
        .page_records(max_pages)?
        .iter()
        .map(|path| read_page_confidence(path))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(dir = %dir.path().display(), pages = pages.len(), "averaging page records");
    Ok(fold_averages(candidates, &pages))
}

/// Persist `avgs.json`, atomically so readers never see a partial verdict.
pub fn write_averages(dir: &DocumentDir, averages: &ConfidenceMap) -> Result<(), PersistenceError> {
    let path = dir.avgs_file();
    if averages.is_empty() {
        return Err(PersistenceError::EmptyMap { path });
    }
    write_json_atomic(&path, averages)
}

pub fn read_averages(dir: &DocumentDir) -> Result<ConfidenceMap, PersistenceError> {
    read_json(&dir.avgs_file())
}

/// Language with the highest average.
///
/// Ties go to the smallest code; NaN never wins.
pub fn verdict(averages: &ConfidenceMap) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (code, &value) in averages {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if value <= top => {}
            _ => best = Some((code.as_str(), value)),
        }
    }
    best.map(|(code, _)| code)
}
