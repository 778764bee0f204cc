//! Language detection command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::ProgressBar;
use tokio::sync::mpsc;

use pdflang::config::{
    Config, DetectOptions, DEFAULT_EXTENSION, DEFAULT_MAX_PAGES, DEFAULT_PARALLEL,
};
use pdflang::ocr::{tools, PdftoppmRasterizer, TesseractRecognizer};
use pdflang::scoring::LinguaScorer;
use pdflang::services::{enumerate_documents, DetectionEvent, DetectionService, DocumentAnalyzer};

use super::usage_error;
use crate::cli::helpers::{bar_style, display_path, pluralize};

#[derive(Args)]
pub struct DetectArgs {
    /// Candidate language as an ISO 639-3 code (repeat for each, at least two)
    #[arg(short = 'l', long = "language", env = "PLD_LANGUAGES", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Directory to search for documents
    #[arg(short, long, env = "PLD_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory to write analysis output to (default: out)
    #[arg(short, long, env = "PLD_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of pages to analyse per document (default: 5)
    #[arg(short, long, env = "PLD_MAX_PAGES", allow_negative_numbers = true)]
    pub max_pages: Option<i64>,

    /// Skip documents that already have a verdict
    #[arg(long)]
    pub resume: bool,

    /// Reuse page images from a previous run
    #[arg(long)]
    pub skip_images: bool,

    /// Reuse recognized pages from a previous run
    #[arg(long)]
    pub skip_ocr: bool,

    /// Number of documents analysed at once (default: 1)
    #[arg(short, long, env = "PLD_PARALLEL")]
    pub parallel: Option<usize>,

    /// Directory output paths are made relative to (default: input directory)
    #[arg(long)]
    pub relative_to: Option<PathBuf>,

    /// File extension of the documents (default: pdf)
    #[arg(short, long, env = "PLD_EXTENSION")]
    pub extension: Option<String>,
}

impl DetectArgs {
    /// Fill unset flags from the config file, then defaults.
    fn into_options(self, config: &Config) -> DetectOptions {
        let languages = if self.languages.is_empty() {
            config.languages.clone()
        } else {
            self.languages
        };

        DetectOptions {
            languages,
            input_dir: self.input_dir,
            output_dir: self.output_dir.unwrap_or_else(|| config.output_dir()),
            max_pages: self.max_pages.or(config.max_pages).unwrap_or(DEFAULT_MAX_PAGES),
            resume: self.resume,
            skip_images: self.skip_images,
            skip_ocr: self.skip_ocr,
            parallel: self.parallel.or(config.parallel).unwrap_or(DEFAULT_PARALLEL),
            relative_to: self.relative_to,
            extension: self
                .extension
                .or_else(|| config.extension.clone())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        }
    }
}

/// Detect the language of every matching document under the input directory.
pub async fn cmd_detect(config: &Config, args: DetectArgs) -> anyhow::Result<()> {
    let settings = match args.into_options(config).validate() {
        Ok(settings) => settings,
        Err(e) => usage_error(e),
    };

    // Check for required tools upfront
    let missing = tools::missing_tools(settings.skip_images, settings.skip_ocr);
    if !missing.is_empty() {
        println!("{} Required tools are missing:", style("✗").red());
        for tool in &missing {
            println!("  - {} (install {})", tool, tools::package_for(tool));
        }
        return Err(anyhow::anyhow!(
            "Missing required tools. Run 'pld check' for details."
        ));
    }

    let layout = settings.layout();
    let documents = enumerate_documents(&settings.input_dir, &settings.extension, &layout)
        .with_context(|| format!("Failed to read {}", settings.input_dir.display()))?;

    if documents.is_empty() {
        println!(
            "{} No .{} documents found in {}",
            style("!").yellow(),
            settings.extension,
            settings.input_dir.display()
        );
        return Ok(());
    }

    println!(
        "{} Detecting language of {} with {}",
        style("→").cyan(),
        pluralize(documents.len(), "document"),
        pluralize(settings.parallel, "worker")
    );

    let languages = settings.languages.clone();
    let scorer = tokio::task::spawn_blocking(move || LinguaScorer::new(&languages))
        .await
        .context("Failed to load language models")?;

    let analyzer = DocumentAnalyzer::new(
        settings.analyzer_settings(),
        Arc::new(PdftoppmRasterizer::new()),
        Arc::new(TesseractRecognizer::new()),
        Arc::new(scorer),
    );
    let service = DetectionService::new(analyzer, settings.resume);

    // Create event channel for progress tracking
    let (event_tx, mut event_rx) = mpsc::channel::<DetectionEvent>(100);

    let progress = ProgressBar::new(documents.len() as u64);
    progress.set_style(bar_style());
    let ui_progress = progress.clone();

    // Spawn event handler for UI
    let event_handler = tokio::spawn(async move {
        let progress = ui_progress;
        while let Some(event) = event_rx.recv().await {
            match event {
                DetectionEvent::Started { document, .. } => {
                    progress.set_message(display_path(&document));
                }
                DetectionEvent::Skipped { document, .. } => {
                    progress.println(format!(
                        "{} {} {}",
                        style("→").dim(),
                        display_path(&document),
                        style("SKIPPED").dim()
                    ));
                    progress.inc(1);
                }
                DetectionEvent::Completed { document, lang, .. } => {
                    progress.println(format!(
                        "{} {} {}",
                        style("✓").green(),
                        display_path(&document),
                        style(lang).bold()
                    ));
                    progress.inc(1);
                }
                DetectionEvent::Failed {
                    document, error, ..
                } => {
                    progress.suspend(|| {
                        eprintln!(
                            "{} {} {}",
                            style("✕").red(),
                            display_path(&document),
                            style(format!("ERROR: {}", error)).red()
                        );
                    });
                    progress.inc(1);
                }
            }
        }
    });

    let result = service.detect(documents, settings.parallel, event_tx).await;
    event_handler.await?;
    progress.finish_and_clear();

    println!(
        "{} {} analysed: {} detected, {} skipped, {} failed",
        style("✓").green(),
        pluralize(result.discovered, "document"),
        result.succeeded,
        result.skipped,
        result.failed
    );
    if result.failed > 0 {
        println!(
            "  {} {} failed (run with -v for details)",
            style("!").yellow(),
            pluralize(result.failed, "document")
        );
    }

    Ok(())
}
