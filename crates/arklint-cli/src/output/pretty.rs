//! Pretty formatter for human-readable terminal output
//!
//! Displays diagnostics with colors, the offending source line with carets
//! under the reported range, and a summary.

use arklint_core::diagnostic::Diagnostic;
use arklint_core::rules::Severity;
use colored::{ColoredString, Colorize};
use std::collections::HashMap;

pub struct PrettyFormatter {
    sources: HashMap<String, String>,
}

impl PrettyFormatter {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    pub fn with_sources(sources: HashMap<String, String>) -> Self {
        Self { sources }
    }

    pub fn format(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if !diagnostics.is_empty() {
            output.push_str(&format_summary(diagnostics));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{}[{}]: {}",
            colorize_severity(diag.severity),
            diag.rule_id.dimmed(),
            diag.message
        ));
        lines.push(format!(
            "  {} {}:{}:{}",
            "-->".blue(),
            diag.file,
            diag.line,
            diag.column
        ));

        let gutter = " ".repeat(diag.line.to_string().len());

        if let Some(source_line) = self.source_line(&diag.file, diag.line) {
            lines.push(format!("{} {}", gutter, "|".blue()));
            lines.push(format!(
                "{} {} {}",
                diag.line.to_string().blue(),
                "|".blue(),
                source_line
            ));

            // Columns are byte columns; pad with the width of what precedes them.
            let prefix = source_line
                .get(..diag.column.saturating_sub(1))
                .map_or(0, |text| text.chars().count());
            let caret_len = if diag.end_line == diag.line && diag.end_column > diag.column {
                source_line
                    .get(diag.column.saturating_sub(1)..diag.end_column - 1)
                    .map_or(diag.end_column - diag.column, |text| text.chars().count())
            } else {
                1
            };
            lines.push(format!(
                "{} {} {}{}",
                gutter,
                "|".blue(),
                " ".repeat(prefix),
                "^".repeat(caret_len.max(1)).red()
            ));
            lines.push(format!("{} {}", gutter, "|".blue()));
        }

        if let Some(suggestion) = &diag.suggestion {
            lines.push(format!(
                "{} {} {} {}",
                gutter,
                "=".blue(),
                "suggestion:".green(),
                suggestion
            ));
        }

        lines.join("\n")
    }

    fn source_line(&self, file: &str, line: usize) -> Option<&str> {
        self.sources.get(file)?.lines().nth(line.checked_sub(1)?)
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
        Severity::Hint => "hint".cyan().bold(),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

fn format_summary(diagnostics: &[Diagnostic]) -> String {
    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    let total = diagnostics.len();
    let problems_str = if total == 1 { "problem" } else { "problems" };

    format!(
        "\nFound {} {} ({}, {})\n",
        total.to_string().bold(),
        problems_str,
        plural(error_count, "error").red(),
        plural(warning_count, "warning").yellow()
    )
}
