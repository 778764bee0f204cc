//! Corpus report command.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::ProgressBar;

use pdflang::config::{Config, DEFAULT_REPORT_FORMAT};
use pdflang::services::{render, ReportService};

use crate::cli::helpers::{pluralize, spinner_style};

/// Assemble every valid analysis under the output directory into one report.
pub async fn cmd_report(
    config: &Config,
    output_dir: Option<PathBuf>,
    report_file: Option<PathBuf>,
    format: Option<String>,
) -> anyhow::Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| config.output_dir());
    let report_file = report_file.unwrap_or_else(|| config.report_file());
    let format = format
        .or_else(|| config.report_format.clone())
        .unwrap_or_else(|| DEFAULT_REPORT_FORMAT.to_string());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Collecting results from {}", output_dir.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let service = ReportService::new(&output_dir);
    let assembly = service.assemble();
    spinner.finish_and_clear();
    let assembly = assembly?;

    let rendered = render(&assembly.entries, &format)?;
    service.write(&report_file, &rendered)?;

    println!(
        "{} {} written to {} ({} of {} analysed documents)",
        style("✓").green(),
        pluralize(assembly.entries.len(), "report"),
        report_file.display(),
        assembly.entries.len(),
        assembly.candidates
    );

    Ok(())
}
