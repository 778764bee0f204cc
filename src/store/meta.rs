//! Document metadata, written before analysis starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{read_json, write_json, DocumentDir, PersistenceError};

/// Links an output directory back to its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub input_file: String,
    pub output_dir: String,
}

impl DocumentMeta {
    /// Both paths are made absolute against the working directory.
    pub fn new(input_file: &Path, output_dir: &Path) -> std::io::Result<Self> {
        Ok(Self {
            input_file: std::path::absolute(input_file)?.to_string_lossy().into_owned(),
            output_dir: std::path::absolute(output_dir)?.to_string_lossy().into_owned(),
        })
    }
}

pub fn write_meta(dir: &DocumentDir, meta: &DocumentMeta) -> Result<(), PersistenceError> {
    write_json(&dir.meta_file(), meta)
}

pub fn read_meta(dir: &DocumentDir) -> Result<DocumentMeta, PersistenceError> {
    read_json(&dir.meta_file())
}
