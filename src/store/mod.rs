//! Persisted per-document analysis state.
//!
//! Everything durable lives in a directory per document under the output
//! root; there is no database. The layout of one directory:
//!
//! ```text
//! <output_root>/<relative/path/stem>/
//!   meta.json        {"input_file": ..., "output_dir": ...}
//!   images/page-*.jpg
//!   texts/*.txt
//!   langs/*.json     {"ENG": 0.93, "FRA": 0.07}
//!   avgs.json        averaged confidences; its presence marks completion
//! ```

mod confidence;
mod layout;
mod meta;
mod text;

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use confidence::{
    compute_document_averages, fold_averages, read_averages, read_page_confidence,
    record_page_confidence, running_average, verdict, write_averages, ConfidenceMap,
};
pub use layout::{
    list_pages, page_index, DocumentDir, LayoutError, OutputLayout, AVGS_FILE, IMAGES_DIR,
    IMAGE_EXT, LANGS_DIR, META_FILE, PAGE_PREFIX, RECORD_EXT, TEXTS_DIR, TEXT_EXT,
};
pub use meta::{read_meta, write_meta, DocumentMeta};
pub use text::append_page_text;

/// Failure reading or writing an artifact.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("empty confidence map for {}", path.display())]
    EmptyMap { path: PathBuf },
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a temp file in the same directory, then rename over `path`.
fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), PersistenceError> {
    let write_err = |source: std::io::Error| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let content = std::fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}
