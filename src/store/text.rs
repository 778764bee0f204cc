use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use super::{DocumentDir, PersistenceError};

/// Append recognized text to `texts/<page_stem>.txt`.
pub fn append_page_text(
    dir: &DocumentDir,
    page_stem: &str,
    text: &str,
) -> Result<PathBuf, PersistenceError> {
    let path = dir.text_file(page_stem);
    let write = || -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(text.as_bytes())
    };
    write().map_err(|source| PersistenceError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_text_is_appended() {
        let temp = TempDir::new().unwrap();
        let dir = DocumentDir::new(temp.path());
        dir.create_dirs().unwrap();

        append_page_text(&dir, "page-1", "first ").unwrap();
        let path = append_page_text(&dir, "page-1", "second").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "first second");
    }
}
