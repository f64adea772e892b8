//! Analysis engine for code analysis and diagnostic generation
//!
//! Provides the core analysis functionality for the CLI and other consumers.

use tracing::debug;

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::rules::{NoUselessBackreference, RuleRegistry, Severity};

pub const PARSE_RULE_ID: &str = "PARSE";

pub struct AnalysisEngine {
    registry: RuleRegistry,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            registry: create_default_registry(&Config::default()),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut registry = create_default_registry(config);
        registry.configure(&config.rules);
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn analyze(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let disable_directives = file.disable_directives();

        for error in file.errors() {
            let diagnostic = Diagnostic::new(
                PARSE_RULE_ID,
                Severity::Error,
                &error.message,
                &file.metadata().filename,
                error.line,
                error.column,
            );
            if !disable_directives.is_disabled(diagnostic.line, &diagnostic.rule_id) {
                diagnostics.push(diagnostic);
            }
        }

        let rule_diagnostics = self.registry.run_all(file);
        for diagnostic in rule_diagnostics {
            if !disable_directives.is_disabled(diagnostic.line, &diagnostic.rule_id) {
                diagnostics.push(diagnostic);
            }
        }

        debug!(
            file = %file.metadata().filename,
            count = diagnostics.len(),
            "analysis finished"
        );
        diagnostics
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn create_default_registry(config: &Config) -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    registry.register(Box::new(NoUselessBackreference::with_settings(config.regex)));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_parsed_file(filename: &str, content: &str) -> ParsedFile {
        ParsedFile::from_source(filename, content)
    }

    fn config_from(toml_str: &str) -> Config {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn analyze_file_returns_diagnostics_for_issues() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", r"const re = /(a)|\1/;");

        let diagnostics = engine.analyze(&file);

        assert!(
            diagnostics.iter().any(|d| d.rule_id == "Q040"),
            "Expected Q040 diagnostic for useless backreference"
        );
    }

    #[test]
    fn clean_file_has_no_diagnostics() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.ts", r"const re: RegExp = /(a)\1/g;");

        assert!(engine.analyze(&file).is_empty());
    }

    #[test]
    fn syntax_errors_become_diagnostics() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file("test.js", "const = ;");

        let diagnostics = engine.analyze(&file);

        let parse = diagnostics
            .iter()
            .find(|d| d.rule_id == PARSE_RULE_ID)
            .expect("Expected PARSE diagnostic for syntax error");
        assert_eq!(parse.severity, Severity::Error);
        assert_eq!(parse.line, 1);
    }

    #[test]
    fn disable_next_line_suppresses_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.js",
            r"// arklint-disable-next-line Q040
const re = /(a)|\1/;",
        );

        assert!(engine.analyze(&file).is_empty());
    }

    #[test]
    fn disable_line_suppresses_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.js",
            r"const re = /\1(a)/; // arklint-disable-line Q040",
        );

        assert!(engine.analyze(&file).is_empty());
    }

    #[test]
    fn disable_for_other_rule_keeps_diagnostic() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.js",
            r"// arklint-disable-next-line Q001
const re = /(a)|\1/;",
        );

        assert_eq!(engine.analyze(&file).len(), 1);
    }

    #[test]
    fn disable_does_not_affect_other_lines() {
        let engine = AnalysisEngine::new();
        let file = make_parsed_file(
            "test.js",
            r"// arklint-disable-next-line
const a = /(a)|\1/;
const b = /(a)|\1/;",
        );

        let diagnostics = engine.analyze(&file);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
    }

    #[test]
    fn config_disables_rule() {
        let config = config_from(
            r#"
[rules]
disabled = ["no-useless-backreference"]
"#,
        );
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.js", r"const re = /(a)|\1/;");

        assert!(engine.analyze(&file).is_empty());
        assert!(!engine.registry().is_rule_enabled("Q040"));
    }

    #[test]
    fn config_overrides_severity() {
        let config = config_from(
            r#"
[rules.severity]
Q040 = "error"
"#,
        );
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.js", r"const re = /(a)|\1/;");

        let diagnostics = engine.analyze(&file);

        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn regex_settings_reach_the_rule() {
        let config = config_from(
            r#"
[regex]
cache_capacity = 0
eviction = "least-recently-used"
"#,
        );
        let engine = AnalysisEngine::with_config(&config);
        let file = make_parsed_file("test.js", r"const a = /(a)|\1/; const b = /(a)|\1/;");

        assert_eq!(engine.analyze(&file).len(), 2);
    }
}
