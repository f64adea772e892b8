//! Check command - analyzes JavaScript/TypeScript/ArkTS files for useless backreferences

use crate::output::OutputFormat;
use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use crate::output::text;
use anyhow::{Context, Result};
use arklint_core::analysis::AnalysisEngine;
use arklint_core::config::{PathFilter, load_config_or_default_with_warnings};
use arklint_core::diagnostic::Diagnostic;
use arklint_core::parser::ParsedFile;
use arklint_core::rules::Severity;
use clap::Args;
use colored::Colorize;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts", "ets",
];

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to file or directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format for diagnostics
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Fail on warnings (exit code 1)
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Filter diagnostics by minimum severity level (error, warning, info, hint)
    #[arg(long, value_name = "LEVEL")]
    pub severity: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Result of analysing a set of files, before rendering.
pub struct CheckReport {
    pub engine: AnalysisEngine,
    pub total_files: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub sources: HashMap<String, String>,
}

impl CheckReport {
    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn should_fail(&self, fail_on_warnings: bool) -> bool {
        self.count(Severity::Error) > 0 || (fail_on_warnings && self.count(Severity::Warning) > 0)
    }
}

impl CheckArgs {
    /// Runs the check and prints the report. Returns whether the process
    /// should exit with a failure status.
    pub fn run(&self) -> Result<bool> {
        self.configure_colors();

        let report = self.analyze()?;
        if report.total_files == 0 {
            println!("No JavaScript/TypeScript/ArkTS files found.");
            return Ok(false);
        }

        match self.format {
            OutputFormat::Json => {
                let formatter = JsonFormatter::with_registry(report.engine.registry());
                let analyzed_path = self.path.to_string_lossy();
                println!(
                    "{}",
                    formatter.format(&report.diagnostics, report.total_files, &analyzed_path)?
                );
            }
            OutputFormat::Text => print!("{}", text::format(&report.diagnostics)),
            OutputFormat::Pretty => {
                let formatter = PrettyFormatter::with_sources(report.sources.clone());
                print!("{}", formatter.format(&report.diagnostics));
            }
        }

        Ok(report.should_fail(self.fail_on_warnings))
    }

    /// Loads configuration, discovers files and analyses them in parallel.
    pub fn analyze(&self) -> Result<CheckReport> {
        let config_result = load_config_or_default_with_warnings(&self.path);
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        let config = config_result.config;
        let filter = config.path_filter().context("invalid include/exclude pattern")?;

        let files = discover_files(&self.path, &filter)?;
        info!(files = files.len(), path = %self.path.display(), "discovered files");

        let engine = AnalysisEngine::with_config(&config);
        let min_severity = self.parse_severity()?;

        let results: Vec<(String, String, Vec<Diagnostic>)> = files
            .par_iter()
            .filter_map(|file| {
                let content = match fs::read_to_string(file) {
                    Ok(content) => content,
                    Err(error) => {
                        warn!(file = %file.display(), %error, "skipping unreadable file");
                        return None;
                    }
                };
                let name = file.to_string_lossy().to_string();
                let parsed = ParsedFile::from_source(&name, &content);
                let diagnostics = engine.analyze(&parsed);
                Some((name, content, diagnostics))
            })
            .collect();

        let mut sources = HashMap::new();
        let mut diagnostics = Vec::new();
        for (name, content, file_diagnostics) in results {
            diagnostics.extend(
                file_diagnostics
                    .into_iter()
                    .filter(|d| d.severity >= min_severity),
            );
            sources.insert(name, content);
        }

        Ok(CheckReport {
            engine,
            total_files: files.len(),
            diagnostics,
            sources,
        })
    }

    fn parse_severity(&self) -> Result<Severity> {
        match self.severity.as_deref() {
            None => Ok(Severity::Hint),
            Some(value) => Severity::parse(value).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid severity '{}'. Valid values: error, warning, info, hint",
                    value
                )
            }),
        }
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }
}

fn discover_files(path: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_supported_file(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Ok(vec![]);
    }

    let files: Vec<PathBuf> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .filter(|e| {
            let relative = e.path().strip_prefix(path).unwrap_or(e.path());
            filter.is_included(relative)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(files)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || name == "node_modules")
}
