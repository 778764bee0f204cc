//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod detect;
mod report;

use std::fmt;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use pdflang::config::Config;

use detect::DetectArgs;

#[derive(Parser)]
#[command(name = "pld")]
#[command(about = "Detect the language of PDF documents and report it across a corpus")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "PLD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the language of every document under a directory
    Detect(DetectArgs),

    /// Write a report of every analysed document
    Report {
        /// Directory holding detection output
        #[arg(short, long, env = "PLD_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
        /// Report file to write (default: report.json)
        #[arg(short = 'f', long, env = "PLD_REPORT_FILE")]
        report_file: Option<PathBuf>,
        /// Report format: json or yaml (default: json)
        #[arg(long, env = "PLD_REPORT_FORMAT")]
        format: Option<String>,
    },

    /// Check that the external tools and language packs are installed
    Check {
        /// Languages to look for in the tesseract install (default: from config)
        #[arg(short = 'l', long = "language", value_delimiter = ',')]
        languages: Vec<String>,
    },
}

/// Abort with a usage error (exit code 2) before any work is done.
fn usage_error(message: impl fmt::Display) -> ! {
    let mut command = Cli::command();
    command.error(ErrorKind::ValueValidation, message).exit()
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => usage_error(e),
    };

    match cli.command {
        Commands::Detect(args) => detect::cmd_detect(&config, args).await,
        Commands::Report {
            output_dir,
            report_file,
            format,
        } => report::cmd_report(&config, output_dir, report_file, format).await,
        Commands::Check { languages } => check::cmd_check(&config, languages).await,
    }
}
