//! Configuration management for pdflang.
//!
//! Settings are layered, later wins: config file, then `PLD_*` environment
//! variables, then command-line flags. Environment and flags are merged by
//! clap before they get here; this module loads the file, fills defaults and
//! validates the result.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::languages::CandidateLanguages;
use crate::services::AnalyzerSettings;
use crate::store::OutputLayout;

pub const DEFAULT_OUTPUT_DIR: &str = "out";
pub const DEFAULT_MAX_PAGES: i64 = 5;
pub const DEFAULT_PARALLEL: usize = 1;
pub const DEFAULT_EXTENSION: &str = "pdf";
pub const DEFAULT_REPORT_FILE: &str = "report.json";
pub const DEFAULT_REPORT_FORMAT: &str = "json";

const CONFIG_NAME: &str = "pld";

/// Config file contents. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Candidate language codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_format: Option<String>,

    /// File this config was loaded from.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load the explicit config file, or a discovered one, or defaults.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::discover().await {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    Self::load_from_path(&path)
                }
                None => Ok(Self::default()),
            },
        }
    }

    /// Find a `pld.*` config file in the standard locations.
    ///
    /// prefer does the discovery; the file itself is parsed with serde by
    /// [`Config::load_from_path`] so that every key keeps its serde type.
    pub async fn discover() -> Option<PathBuf> {
        match prefer::load(CONFIG_NAME).await {
            Ok(found) => found.source_path().map(|p| p.to_path_buf()),
            Err(_) => {
                tracing::debug!("No {} config file found", CONFIG_NAME);
                None
            }
        }
    }

    /// Parse a config file by extension: TOML, YAML, anything else as JSON.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let parse_err = |message: String| ConfigError::ParseFile {
            path: path.to_path_buf(),
            message,
        };

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?
            }
            _ => serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path from the config file.
    /// - `~` is expanded
    /// - Relative paths are resolved against the config file's directory
    pub fn resolve_path(&self, path_str: &str) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        match self.base_dir() {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => self.resolve_path(dir),
            None => PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn report_file(&self) -> PathBuf {
        match &self.report_file {
            Some(file) => self.resolve_path(file),
            None => PathBuf::from(DEFAULT_REPORT_FILE),
        }
    }
}

/// Unvalidated options for a detection run.
#[derive(Debug, Clone)]
pub struct DetectOptions {
    pub languages: Vec<String>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_pages: i64,
    pub resume: bool,
    pub skip_images: bool,
    pub skip_ocr: bool,
    pub parallel: usize,
    pub relative_to: Option<PathBuf>,
    pub extension: String,
}

impl DetectOptions {
    /// Options with defaults for everything but languages and input.
    pub fn new(languages: Vec<String>, input_dir: impl Into<PathBuf>) -> Self {
        Self {
            languages,
            input_dir: input_dir.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_pages: DEFAULT_MAX_PAGES,
            resume: false,
            skip_images: false,
            skip_ocr: false,
            parallel: DEFAULT_PARALLEL,
            relative_to: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Validate against the machine's available parallelism.
    pub fn validate(self) -> Result<DetectSettings, ConfigError> {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.validate_with_parallelism(available)
    }

    pub fn validate_with_parallelism(
        self,
        available: usize,
    ) -> Result<DetectSettings, ConfigError> {
        let languages = CandidateLanguages::new(&self.languages)?;

        if !self.input_dir.is_dir() {
            return Err(ConfigError::InputDirMissing(self.input_dir));
        }
        let input_dir = self.input_dir.canonicalize()?;

        let relative_to = match self.relative_to {
            Some(dir) => {
                let canonical = dir.canonicalize().map_err(|_| ConfigError::NotAnAncestor {
                    relative_to: dir.clone(),
                    input_dir: input_dir.clone(),
                })?;
                if !input_dir.starts_with(&canonical) {
                    return Err(ConfigError::NotAnAncestor {
                        relative_to: dir,
                        input_dir,
                    });
                }
                canonical
            }
            None => input_dir.clone(),
        };

        if self.max_pages < 1 {
            return Err(ConfigError::InvalidMaxPages(self.max_pages));
        }
        let max_pages = u32::try_from(self.max_pages).unwrap_or(u32::MAX);

        if self.parallel < 1 || self.parallel > available {
            return Err(ConfigError::ParallelOutOfRange {
                requested: self.parallel,
                available,
            });
        }

        let extension = self.extension.trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }

        Ok(DetectSettings {
            languages,
            input_dir,
            output_dir: std::path::absolute(&self.output_dir)?,
            relative_to,
            max_pages,
            resume: self.resume,
            skip_images: self.skip_images,
            skip_ocr: self.skip_ocr,
            parallel: self.parallel,
            extension,
        })
    }
}

/// Validated settings for a detection run.
#[derive(Debug, Clone)]
pub struct DetectSettings {
    pub languages: CandidateLanguages,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub relative_to: PathBuf,
    pub max_pages: u32,
    pub resume: bool,
    pub skip_images: bool,
    pub skip_ocr: bool,
    pub parallel: usize,
    pub extension: String,
}

impl DetectSettings {
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_dir, &self.relative_to)
    }

    pub fn analyzer_settings(&self) -> AnalyzerSettings {
        AnalyzerSettings {
            languages: self.languages.clone(),
            max_pages: self.max_pages,
            skip_images: self.skip_images,
            skip_ocr: self.skip_ocr,
        }
    }
}
