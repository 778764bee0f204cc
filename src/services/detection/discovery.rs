//! Document enumeration.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::store::OutputLayout;

use super::types::Document;

/// Every file under `input_dir` with exactly `extension`, sorted by path.
///
/// Unreadable subdirectories are logged and skipped. Symlinked directories
/// are not followed.
pub fn enumerate_documents(
    input_dir: &Path,
    extension: &str,
    layout: &OutputLayout,
) -> std::io::Result<Vec<Document>> {
    let mut files = Vec::new();
    collect_files(input_dir, OsStr::new(extension), &mut files, true)?;
    files.sort();

    let mut documents = Vec::with_capacity(files.len());
    for source in files {
        match layout.output_location(&source) {
            Ok(output) => documents.push(Document { source, output }),
            Err(e) => tracing::warn!("Skipping {}: {}", source.display(), e),
        }
    }
    Ok(documents)
}

fn collect_files(
    dir: &Path,
    extension: &OsStr,
    files: &mut Vec<PathBuf>,
    is_root: bool,
) -> std::io::Result<()> {
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
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            collect_files(&path, extension, files, false)?;
        } else if path.is_file() && path.extension() == Some(extension) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recursive_sorted_exact_extension() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("b/nested")).unwrap();
        std::fs::create_dir_all(root.join("a")).unwrap();
        for name in ["b/nested/z.pdf", "a/y.pdf", "x.pdf", "upper.PDF", "notes.txt"] {
            std::fs::write(root.join(name), b"%PDF").unwrap();
        }

        let layout = OutputLayout::new(root.join("out"), root);
        let documents = enumerate_documents(root, "pdf", &layout).unwrap();
        let sources: Vec<_> = documents
            .iter()
            .map(|d| d.source.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            sources,
            vec![
                PathBuf::from("a/y.pdf"),
                PathBuf::from("b/nested/z.pdf"),
                PathBuf::from("x.pdf"),
            ]
        );
        assert_eq!(documents[1].output.path(), root.join("out/b/nested/z"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let layout = OutputLayout::new(temp.path().join("out"), &missing);
        assert!(enumerate_documents(&missing, "pdf", &layout).is_err());
    }
}
