//! Explain command - provides detailed explanation of a rule

use arklint_core::analysis::AnalysisEngine;
use arklint_core::config::load_config_or_default_with_warnings;
use arklint_core::rules::{RuleMetadata, Severity};
use clap::Args;
use colored::Colorize;
use std::env;
use std::fmt::Write;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[arg(
        value_name = "RULE",
        help = "Rule ID or name to explain (e.g., \"Q040\", \"no-useless-backreference\")"
    )]
    pub rule_id: String,
}

impl ExplainArgs {
    /// Returns whether the rule was unknown.
    pub fn run(&self) -> anyhow::Result<bool> {
        let cwd = env::current_dir()?;
        let config = load_config_or_default_with_warnings(&cwd).config;
        let engine = AnalysisEngine::with_config(&config);
        let registry = engine.registry();

        match registry.find_rule(&self.rule_id) {
            Some(rule) => {
                let enabled = registry.is_rule_enabled(&self.rule_id);
                let severity = registry.effective_severity(rule.metadata());
                print!("{}", describe(rule.metadata(), severity, enabled));
                Ok(false)
            }
            None => {
                eprintln!(
                    "{} unknown rule '{}'",
                    "error:".red().bold(),
                    self.rule_id
                );
                eprintln!();
                eprintln!("Available rules:");
                for rule in registry.rules() {
                    let meta = rule.metadata();
                    eprintln!("  {} ({})", meta.id, meta.name);
                }
                Ok(true)
            }
        }
    }
}

fn describe(metadata: &RuleMetadata, severity: Severity, enabled: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", format!("Rule {}", metadata.id).bold());
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}: {}", "Name".cyan(), metadata.name);
    let _ = writeln!(out, "  {}: {}", "Description".cyan(), metadata.description);
    let _ = writeln!(out, "  {}: {}", "Severity".cyan(), format_severity(severity));

    if let Some(url) = metadata.docs_url {
        let _ = writeln!(out, "  {}: {}", "Documentation".cyan(), url);
    }

    if let Some(examples) = metadata.examples {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}:", "Examples".cyan());
        for line in examples.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }

    let _ = writeln!(out);
    let status = if enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    let _ = writeln!(out, "  {}: {}", "Status".cyan(), status);
    out
}

fn format_severity(severity: Severity) -> String {
    match severity {
        Severity::Error => "error".red().to_string(),
        Severity::Warning => "warning".yellow().to_string(),
        Severity::Info => "info".blue().to_string(),
        Severity::Hint => "hint".cyan().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arklint_core::config::Config;

    #[test]
    fn explain_known_rule_by_id_and_name() {
        let engine = AnalysisEngine::with_config(&Config::default());
        let registry = engine.registry();

        let by_id = registry.find_rule("Q040").expect("Q040 should exist");
        let by_name = registry
            .find_rule("no-useless-backreference")
            .expect("rule should be found by name");

        assert_eq!(by_id.metadata(), by_name.metadata());
    }

    #[test]
    fn explain_unknown_rule_returns_none() {
        let engine = AnalysisEngine::new();

        assert!(engine.registry().find_rule("Q999").is_none());
    }

    #[test]
    fn describe_includes_metadata_and_examples() {
        colored::control::set_override(false);
        let engine = AnalysisEngine::new();
        let rule = engine.registry().find_rule("Q040").unwrap();

        let text = describe(rule.metadata(), Severity::Warning, true);

        assert!(text.contains("Rule Q040"));
        assert!(text.contains("Name: no-useless-backreference"));
        assert!(text.contains("Severity: warning"));
        assert!(text.contains("// Bad"));
        assert!(text.contains("Status: enabled"));
    }

    #[test]
    fn describe_reports_disabled_rule() {
        colored::control::set_override(false);
        let engine = AnalysisEngine::new();
        let rule = engine.registry().find_rule("Q040").unwrap();

        let text = describe(rule.metadata(), Severity::Error, false);

        assert!(text.contains("Severity: error"));
        assert!(text.contains("Status: disabled"));
    }
}
