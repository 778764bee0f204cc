//! Service layer.
//!
//! Services hold the batch logic and report progress through channels,
//! leaving presentation to the CLI.

pub mod detection;
pub mod report;

pub use detection::{
    enumerate_documents, AnalyzerSettings, DetectionEvent, DetectionResult, DetectionService,
    Document, DocumentAnalyzer,
};
pub use report::{render, Assembly, ReportEntry, ReportError, ReportFormat, ReportService};
