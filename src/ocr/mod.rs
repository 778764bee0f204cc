//! Page rasterization and text recognition.
//!
//! Both steps shell out to external tools:
//! - pdftoppm (Poppler) renders the first pages of a PDF to JPEG
//! - Tesseract OCR reads each page image, hinted with the candidate languages
//!
//! The pipeline only sees the [`Rasterizer`] and [`TextRecognizer`] traits.

mod backend;
mod pdftoppm;
mod tesseract;
pub mod tools;

pub use backend::{OcrError, Rasterizer, TextRecognizer};
pub use pdftoppm::PdftoppmRasterizer;
pub use tesseract::TesseractRecognizer;
