//! Where each document's artifacts live.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::PersistenceError;

pub const IMAGES_DIR: &str = "images";
pub const TEXTS_DIR: &str = "texts";
pub const LANGS_DIR: &str = "langs";
pub const META_FILE: &str = "meta.json";
pub const AVGS_FILE: &str = "avgs.json";

/// Page images are named `page-<n>.jpg` by the rasterizer.
pub const PAGE_PREFIX: &str = "page";
pub const IMAGE_EXT: &str = "jpg";
pub const TEXT_EXT: &str = "txt";
pub const RECORD_EXT: &str = "json";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("{} is not inside {}", document.display(), root.display())]
    OutsideRoot { document: PathBuf, root: PathBuf },

    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
}

/// Maps source documents to output directories.
///
/// A document at `<relative_to>/a/b/report.pdf` is analysed into
/// `<output_root>/a/b/report/`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    output_root: PathBuf,
    relative_to: PathBuf,
}

impl OutputLayout {
    pub fn new(output_root: impl Into<PathBuf>, relative_to: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            relative_to: relative_to.into(),
        }
    }

    pub fn output_location(&self, document: &Path) -> Result<DocumentDir, LayoutError> {
        let relative =
            document
                .strip_prefix(&self.relative_to)
                .map_err(|_| LayoutError::OutsideRoot {
                    document: document.to_path_buf(),
                    root: self.relative_to.clone(),
                })?;
        let stem = relative
            .file_stem()
            .ok_or_else(|| LayoutError::NoFileName(document.to_path_buf()))?;

        let mut location = self.output_root.clone();
        if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
            location.push(parent);
        }
        location.push(stem);
        Ok(DocumentDir::new(location))
    }
}

/// One document's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentDir {
    root: PathBuf,
}

impl DocumentDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn texts_dir(&self) -> PathBuf {
        self.root.join(TEXTS_DIR)
    }

    pub fn langs_dir(&self) -> PathBuf {
        self.root.join(LANGS_DIR)
    }

    pub fn meta_file(&self) -> PathBuf {
        self.root.join(META_FILE)
    }

    pub fn avgs_file(&self) -> PathBuf {
        self.root.join(AVGS_FILE)
    }

    pub fn text_file(&self, page_stem: &str) -> PathBuf {
        self.texts_dir().join(format!("{page_stem}.{TEXT_EXT}"))
    }

    pub fn record_file(&self, page_stem: &str) -> PathBuf {
        self.langs_dir().join(format!("{page_stem}.{RECORD_EXT}"))
    }

    /// Create the artifact subdirectories. Idempotent.
    pub fn create_dirs(&self) -> Result<(), PersistenceError> {
        for dir in [self.images_dir(), self.texts_dir(), self.langs_dir()] {
            std::fs::create_dir_all(&dir)
                .map_err(|source| PersistenceError::Write { path: dir, source })?;
        }
        Ok(())
    }

    /// Resume guard: a verdict has been persisted.
    pub fn is_complete(&self) -> bool {
        self.avgs_file().exists()
    }

    /// Every artifact a report entry needs is present.
    pub fn is_valid(&self) -> bool {
        self.images_dir().is_dir()
            && self.texts_dir().is_dir()
            && self.langs_dir().is_dir()
            && self.avgs_file().is_file()
            && self.meta_file().is_file()
    }

    pub fn page_images(&self, max_pages: u32) -> Result<Vec<PathBuf>, PersistenceError> {
        let dir = self.images_dir();
        list_pages(&dir, IMAGE_EXT, max_pages)
            .map_err(|source| PersistenceError::Read { path: dir, source })
    }

    pub fn page_records(&self, max_pages: u32) -> Result<Vec<PathBuf>, PersistenceError> {
        let dir = self.langs_dir();
        list_pages(&dir, RECORD_EXT, max_pages)
            .map_err(|source| PersistenceError::Read { path: dir, source })
    }
}

/// Page number from a `page-<n>` stem.
pub fn page_index(path: &Path) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .rsplit('-')
        .next()?
        .parse()
        .ok()
}

/// Files in `dir` with `extension`, in page order, at most `max_pages`.
///
/// Numbered pages sort by number, so `page-2` precedes `page-10` whether or
/// not the rasterizer padded the index. Anything else sorts after, by name.
pub fn list_pages(dir: &Path, extension: &str, max_pages: u32) -> std::io::Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
            pages.push(path);
        }
    }

    pages.sort_by(|a, b| compare_pages(a, b));
    pages.truncate(max_pages as usize);
    Ok(pages)
}

fn compare_pages(a: &Path, b: &Path) -> Ordering {
    match (page_index(a), page_index(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
