//! Corpus report service.
//!
//! Rebuilds the report purely from what detection runs left on disk. Runs
//! independently of detection and tolerates partial or malformed output:
//! incomplete directories are excluded, unreadable ones are logged and
//! skipped.

mod types;

use std::path::{Path, PathBuf};

use crate::languages;
use crate::store::{read_averages, read_meta, verdict, DocumentDir, AVGS_FILE, META_FILE};

pub use types::{Assembly, ReportEntry, ReportError, ReportFormat};

/// Service for assembling and writing corpus reports.
pub struct ReportService {
    output_dir: PathBuf,
}

impl ReportService {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directories under the output root holding `meta.json` or `avgs.json`.
    ///
    /// Returned in path order. A missing output root yields nothing.
    pub fn discover(&self) -> Result<Vec<DocumentDir>, ReportError> {
        let mut found = Vec::new();
        if !self.output_dir.exists() {
            tracing::warn!("Output directory {} does not exist", self.output_dir.display());
            return Ok(found);
        }
        walk(&self.output_dir, &mut found, true).map_err(|source| ReportError::Discover {
            path: self.output_dir.clone(),
            source,
        })?;
        found.sort();
        Ok(found)
    }

    /// Build one entry per valid analysed document.
    pub fn assemble(&self) -> Result<Assembly, ReportError> {
        let candidates = self.discover()?;
        let mut entries = Vec::new();

        for dir in &candidates {
            if !dir.is_valid() {
                tracing::debug!("Excluding incomplete output {}", dir.path().display());
                continue;
            }
            if let Some(entry) = entry_for(dir) {
                entries.push(entry);
            }
        }

        Ok(Assembly {
            entries,
            candidates: candidates.len(),
        })
    }

    /// Write a rendered report.
    pub fn write(&self, path: &Path, rendered: &str) -> Result<(), ReportError> {
        std::fs::write(path, rendered).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Render entries as `format` (`json`, `yaml` or `yml`).
pub fn render(entries: &[ReportEntry], format: &str) -> Result<String, ReportError> {
    match format.parse::<ReportFormat>()? {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(entries)?),
    }
}

/// Report entry for a valid directory, or `None` if its contents are unusable.
pub fn entry_for(dir: &DocumentDir) -> Option<ReportEntry> {
    let averages = match read_averages(dir) {
        Ok(averages) => averages,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", dir.path().display(), e);
            return None;
        }
    };
    let meta = match read_meta(dir) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", dir.path().display(), e);
            return None;
        }
    };
    let Some(lang) = verdict(&averages) else {
        tracing::warn!("Skipping {}: no language averages", dir.path().display());
        return None;
    };

    let lang_name = languages::display_name(lang).unwrap_or_else(|| {
        tracing::warn!("No display name for language {}", lang);
        lang.to_string()
    });

    Some(ReportEntry {
        lang: lang.to_string(),
        lang_name,
        input_file: meta.input_file,
        output_dir: meta.output_dir,
    })
}

fn walk(dir: &Path, found: &mut Vec<DocumentDir>, is_root: bool) -> std::io::Result<()> {
    if dir.join(META_FILE).is_file() || dir.join(AVGS_FILE).is_file() {
        found.push(DocumentDir::new(dir));
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if !is_root => {
            tracing::warn!("Cannot read {}: {}", dir.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            walk(&entry.path(), found, false)?;
        }
    }
    Ok(())
}
