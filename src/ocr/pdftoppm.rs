//! Page rasterization with poppler's `pdftoppm`.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::backend::{OcrError, Rasterizer};
use super::tools::{run_tool, PDFTOPPM};
use crate::store::{list_pages, IMAGE_EXT, PAGE_PREFIX};

/// Renders pages to `images/page-<n>.jpg`.
#[derive(Debug, Clone, Default)]
pub struct PdftoppmRasterizer;

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(
        &self,
        document: &Path,
        max_pages: u32,
        images_dir: &Path,
    ) -> Result<Vec<PathBuf>, OcrError> {
        let last_page = max_pages.to_string();
        run_tool(
            Command::new(PDFTOPPM)
                .args(["-l", &last_page, "-jpeg"])
                .arg(document)
                .arg(images_dir.join(PAGE_PREFIX)),
            PDFTOPPM,
        )?;

        let pages = list_pages(images_dir, IMAGE_EXT, max_pages)?;
        if pages.is_empty() {
            return Err(OcrError::OcrFailed(format!(
                "no page images generated for {}",
                document.display()
            )));
        }
        tracing::debug!(document = %document.display(), pages = pages.len(), "rasterized");
        Ok(pages)
    }
}
