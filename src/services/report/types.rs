//! Report service types.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One analysed document in the corpus report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Verdict language code, e.g. `ENG`
    pub lang: String,
    /// Upper-case language name, e.g. `ENGLISH`
    pub lang_name: String,
    pub input_file: String,
    pub output_dir: String,
}

/// Entries built from an output tree.
#[derive(Debug, Default)]
pub struct Assembly {
    pub entries: Vec<ReportEntry>,
    /// Directories that looked like analysis output, valid or not.
    pub candidates: usize,
}

/// Serialization format of the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unsupported report format: {0} (expected json or yaml)")]
    UnsupportedFormat(String),

    #[error("failed to serialize report as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize report as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read output directory {}: {source}", path.display())]
    Discover {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
