//! Configuration handling for curly-quotes

use crate::quotes::{QuotePair, QuoteStyle};
use crate::Severity;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("Failed to parse JSON config: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("Failed to parse YAML config: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(#[from] globset::Error),
}

/// File names searched for by [`Config::find_and_load`], in priority order
pub const CONFIG_FILE_NAMES: [&str; 6] = [
    ".curlyquotesrc.json",
    ".curlyquotesrc.yaml",
    ".curlyquotesrc.yml",
    ".curlyquotesrc",
    "curlyquotes.json",
    "curlyquotes.yaml",
];

/// Options of the `no-straight-quotes` rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RuleOptions {
    /// Single opening typographic quotation mark
    pub single_opening: String,
    /// Single closing typographic quotation mark (also used for apostrophes)
    pub single_closing: String,
    /// Double opening typographic quotation mark
    pub double_opening: String,
    /// Double closing typographic quotation mark
    pub double_closing: String,
    /// Elements whose content is never rewritten
    #[serde(alias = "ignored-jsx-elements")]
    pub ignored_elements: Vec<String>,
    /// Attributes whose values are never rewritten
    #[serde(alias = "ignored-jsx-attributes")]
    pub ignored_attributes: Vec<String>,
    /// Calls (dotted callee names) whose arguments are never rewritten
    pub ignored_function_calls: Vec<String>,
    /// Object property keys whose values are never rewritten
    pub ignored_object_properties: Vec<String>,
}

impl Default for RuleOptions {
    fn default() -> Self {
        let style = QuoteStyle::default();
        Self {
            single_opening: style.single.opening,
            single_closing: style.single.closing,
            double_opening: style.double.opening,
            double_closing: style.double.closing,
            ignored_elements: vec!["script".to_string(), "style".to_string()],
            ignored_attributes: ["className", "id", "key", "style"]
                .into_iter()
                .map(String::from)
                .collect(),
            ignored_function_calls: [
                "document.querySelector",
                "document.querySelectorAll",
                "Error",
                "RegExp",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ignored_object_properties: Vec::new(),
        }
    }
}

impl RuleOptions {
    /// Replacement characters configured for both quote families
    pub fn quote_style(&self) -> QuoteStyle {
        QuoteStyle {
            single: QuotePair::new(&self.single_opening, &self.single_closing),
            double: QuotePair::new(&self.double_opening, &self.double_closing),
        }
    }
}

/// Runtime lint configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Rule options
    pub options: RuleOptions,
    /// Severity reported for straight quotes
    pub severity: Severity,
    /// Verbose output
    pub verbose: bool,
    /// Show statistics at the end
    pub statistics: bool,
    /// File patterns to exclude
    pub exclude_patterns: GlobSet,
    /// Filename patterns to include (if set, only lint matching files)
    pub filename_patterns: Option<GlobSet>,
    /// Number of parallel jobs (0 = auto)
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: RuleOptions::default(),
            severity: Severity::Warning,
            verbose: false,
            statistics: false,
            exclude_patterns: GlobSet::empty(),
            filename_patterns: None,
            jobs: 0,
        }
    }
}

/// CLI options to merge into config
#[derive(Debug, Default)]
pub struct CliOptions {
    /// Severity to report with
    pub severity: Option<Severity>,
    /// Additional exclude patterns
    pub exclude: Vec<String>,
    /// Additional filename patterns
    pub filename: Vec<String>,
    /// Verbose output
    pub verbose: bool,
    /// Show statistics
    pub statistics: bool,
    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Configuration file format (.curlyquotesrc.json or .curlyquotesrc.yaml)
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Rule options, keyed like the rule's own option names
    #[serde(default)]
    pub options: RuleOptions,

    /// Severity: "error", "warning", or "info"
    #[serde(default)]
    pub severity: Option<String>,

    /// File/folder patterns to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Filename patterns to include (only lint matching files)
    #[serde(default)]
    pub filename: Vec<String>,

    /// Number of parallel jobs (0 = auto)
    #[serde(default)]
    pub jobs: usize,
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config_file: ConfigFile = if path.extension().is_some_and(|e| e == "yaml" || e == "yml")
        {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Self::from_config_file(config_file)
    }

    /// Try to find and load config from the directory and its ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut current = start_dir.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    info!("loading config from {}", config_path.display());
                    let config = Self::from_file(&config_path)?;
                    return Ok(Some((config_path, config)));
                }
            }

            if !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Build config from a ConfigFile
    pub fn from_config_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let exclude_patterns = build_globset(&file.exclude)?;

        let filename_patterns = if file.filename.is_empty() {
            None
        } else {
            Some(build_globset(&file.filename)?)
        };

        let severity = file
            .severity
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Severity::Warning);

        Ok(Self {
            options: file.options,
            severity,
            verbose: false,
            statistics: false,
            exclude_patterns,
            filename_patterns,
            jobs: file.jobs,
        })
    }

    /// Merge CLI options into this config (CLI takes precedence)
    pub fn merge_cli(&mut self, opts: CliOptions) -> Result<(), ConfigError> {
        if let Some(severity) = opts.severity {
            self.severity = severity;
        }

        // CLI patterns replace the configured ones
        if !opts.exclude.is_empty() {
            self.exclude_patterns = build_globset(&opts.exclude)?;
        }
        if !opts.filename.is_empty() {
            self.filename_patterns = Some(build_globset(&opts.filename)?);
        }

        self.verbose = opts.verbose;
        self.statistics = opts.statistics;

        if let Some(j) = opts.jobs {
            self.jobs = j;
        }

        Ok(())
    }

    /// Check if a file matches the filename pattern filter
    pub fn matches_filename_pattern(&self, file_path: &Path) -> bool {
        match &self.filename_patterns {
            Some(patterns) => patterns.is_match(file_path),
            None => true,
        }
    }

    /// Check if a file should be excluded
    pub fn is_file_excluded(&self, file_path: &Path) -> bool {
        self.exclude_patterns.is_match(file_path)
    }

    /// Check if a file should be linted at all
    pub fn should_lint(&self, file_path: &Path) -> bool {
        !self.is_file_excluded(file_path) && self.matches_filename_pattern(file_path)
    }
}
