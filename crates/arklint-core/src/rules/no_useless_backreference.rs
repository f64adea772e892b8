//! no-useless-backreference rule (Q040): Detects backreferences that can never match anything

use std::ops::ControlFlow;

use swc_common::Span;
use swc_ecma_ast::{CallExpr, Callee, Expr, ExprOrSpread, Lit, MemberProp, NewExpr, Regex};

use crate::config::RegexConfig;
use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::regexp::{BackreferenceAnalyzer, PatternCache, UselessBackreference};
use crate::rules::static_string::{ConstStringCollector, ConstStrings};
use crate::rules::{Rule, RuleMetadata, Severity};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

pub const SUGGESTION: &str =
    "Remove the backreference or move it where its group has already been matched";

declare_rule!(
    NoUselessBackreference,
    id = "Q040",
    name = "no-useless-backreference",
    description = "Disallow backreferences in regular expressions that can never match anything",
    severity = Warning,
    settings = RegexConfig,
    examples = "// Bad\nconst re = /(a)|\\1b/;\nconst re = /\\1(a)/;\nconst re = new RegExp('(?!(a))\\\\1');\n\n// Good\nconst re = /(a)\\1/;\nconst re = /(?<quote>['\"]).*\\k<quote>/;"
);

impl Rule for NoUselessBackreference {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut constants = ConstStringCollector::default();
        walk_ast(module, &mut constants, &ctx);

        let cache = PatternCache::new(self.settings.cache_capacity, self.settings.eviction);
        let mut visitor = BackreferenceVisitor {
            diagnostics: Vec::new(),
            file_path: file.metadata().filename.clone(),
            severity: self.metadata.severity,
            analyzer: BackreferenceAnalyzer::with_cache(cache),
            constants: constants.finish(),
        };

        walk_ast(module, &mut visitor, &ctx);
        visitor.diagnostics
    }
}

struct BackreferenceVisitor {
    diagnostics: Vec<Diagnostic>,
    file_path: String,
    severity: Severity,
    analyzer: BackreferenceAnalyzer,
    constants: ConstStrings,
}

impl BackreferenceVisitor {
    fn report(&mut self, violation: &UselessBackreference, start: (usize, usize), end: (usize, usize)) {
        let diagnostic = Diagnostic::new(
            "Q040",
            self.severity,
            violation.message(),
            &self.file_path,
            start.0,
            start.1,
        )
        .with_end(end.0, end.1)
        .with_suggestion(SUGGESTION);
        self.diagnostics.push(diagnostic);
    }

    /// Regex literals point at the backreference itself: the literal body is
    /// the pattern text verbatim and cannot span lines.
    fn check_literal(&mut self, node: &Regex, ctx: &VisitorContext) {
        let violations = self.analyzer.analyze(&node.exp, &node.flags);
        if violations.is_empty() {
            return;
        }

        let body_start = ctx.file().offset_of(node.span.lo) + 1;
        for violation in &violations {
            let (line, column) = ctx.offset_to_location(body_start + violation.offset);
            self.report(violation, (line, column), (line, column + violation.len()));
        }
    }

    /// `RegExp(pattern, flags)` with or without `new`. Escape processing in
    /// string arguments breaks the offset mapping, so diagnostics point at
    /// the whole expression.
    fn check_construction(&mut self, args: &[ExprOrSpread], span: Span, ctx: &VisitorContext) {
        let Some(pattern_arg) = args.first() else {
            return;
        };
        if pattern_arg.spread.is_some() || matches!(*pattern_arg.expr, Expr::Lit(Lit::Regex(_))) {
            return;
        }
        let Some(pattern) = self.constants.resolve(&pattern_arg.expr) else {
            return;
        };

        let flags = args
            .get(1)
            .filter(|arg| arg.spread.is_none())
            .and_then(|arg| self.constants.resolve(&arg.expr))
            .unwrap_or_default();

        let violations = self.analyzer.analyze(&pattern, &flags);
        if violations.is_empty() {
            return;
        }

        let start = ctx.span_to_location(span);
        let end = ctx.pos_to_location(span.hi);
        for violation in &violations {
            self.report(violation, start, end);
        }
    }
}

/// `RegExp` or `globalThis.RegExp`, possibly parenthesised.
fn is_regexp_constructor(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(ident) => ident.sym.as_ref() == "RegExp",
        Expr::Paren(paren) => is_regexp_constructor(&paren.expr),
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return false;
            };
            prop.sym.as_ref() == "RegExp"
                && matches!(&*member.obj, Expr::Ident(obj) if obj.sym.as_ref() == "globalThis")
        }
        _ => false,
    }
}

impl AstVisitor for BackreferenceVisitor {
    fn visit_regex(&mut self, node: &Regex, ctx: &VisitorContext) -> ControlFlow<()> {
        self.check_literal(node, ctx);
        ControlFlow::Continue(())
    }

    fn visit_new_expr(&mut self, node: &NewExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        if is_regexp_constructor(&node.callee) {
            if let Some(args) = &node.args {
                self.check_construction(args, node.span, ctx);
            }
        }
        ControlFlow::Continue(())
    }

    fn visit_call_expr(&mut self, node: &CallExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        if let Callee::Expr(callee) = &node.callee {
            if is_regexp_constructor(callee) {
                self.check_construction(&node.args, node.span, ctx);
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regexp::EvictionPolicy;

    fn run(code: &str) -> Vec<Diagnostic> {
        let file = ParsedFile::from_source("test.js", code);
        NoUselessBackreference::new().check(&file)
    }

    #[test]
    fn detects_disjunctive_literal() {
        let diagnostics = run(r"const re = /(a)|\1b/;");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, "Q040");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(
            diagnostics[0].message,
            r"Backreference '\1' will be ignored. It references group '(a)' which is in another alternative."
        );
        assert_eq!(diagnostics[0].suggestion.as_deref(), Some(SUGGESTION));
    }

    #[test]
    fn literal_diagnostic_points_at_the_backreference() {
        let diagnostics = run("let x;\nconst re = /(a)|\\1b/;");

        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].column, 17);
        assert_eq!(diagnostics[0].end_line, 2);
        assert_eq!(diagnostics[0].end_column, 19);
    }

    #[test]
    fn reports_each_useless_reference_in_order() {
        let diagnostics = run(r"const re = /\1(a)|(b)\2\k<c>(?<c>d)/;");

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains(r"'\1'"));
        assert!(diagnostics[0].message.contains("appears later"));
        assert!(diagnostics[1].message.contains(r"'\k<c>'"));
        assert!(diagnostics[0].column < diagnostics[1].column);
    }

    #[test]
    fn useful_backreferences_are_ignored() {
        assert!(run(r"const re = /(a)\1/;").is_empty());
        assert!(run(r"const re = /(?<q>['\x22]).*\k<q>/u;").is_empty());
        assert!(run(r"const re = /(a)(?!\1)/;").is_empty());
        assert!(run(r"const re = /[\1](a)/;").is_empty());
    }

    #[test]
    fn detects_new_regexp_with_string() {
        let diagnostics = run(r#"const re = new RegExp("(\\1)");"#);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("from within that group"));
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[0].column, 12);
    }

    #[test]
    fn detects_regexp_call_and_global_this() {
        let code = r#"
const a = RegExp('(?<=(a)\\1)');
const b = new globalThis.RegExp(`(?!(a))\\1`, 'u');
"#;
        let diagnostics = run(code);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("before in the same lookbehind"));
        assert_eq!(diagnostics[0].line, 2);
        assert!(diagnostics[1].message.contains("negative lookaround"));
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn template_with_surrogate_pair_escape_is_checked() {
        let from_string = run(r#"new RegExp("(a)|\uD83D\uDE00\\1");"#);
        let from_template = run(r"new RegExp(`(a)|\uD83D\uDE00\\1`);");

        assert_eq!(from_string.len(), 1);
        assert_eq!(from_template.len(), 1);
        assert!(from_template[0].message.contains("another alternative"));
    }

    #[test]
    fn resolves_const_and_concatenated_patterns() {
        let code = r#"
const GROUP = "(a)";
const re = new RegExp(GROUP + "|" + "\\1", FLAGS);
"#;
        let diagnostics = run(code);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("another alternative"));
    }

    #[test]
    fn dynamic_patterns_are_skipped() {
        assert!(run(r#"new RegExp(source + "\\1");"#).is_empty());
        assert!(run(r#"let p = "(a)|\\1"; new RegExp(p);"#).is_empty());
        assert!(run(r#"new RegExp(...parts);"#).is_empty());
        assert!(run(r#"new Pattern("(a)|\\1");"#).is_empty());
    }

    #[test]
    fn regex_literal_argument_is_reported_once() {
        let diagnostics = run(r#"new RegExp(/(a)|\1/, "g");"#);

        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        assert!(run(r#"new RegExp("(a)|\\1(");"#).is_empty());
        assert_eq!(run(r#"new RegExp("(a)|\\1", "u", "extra");"#).len(), 1);
    }

    #[test]
    fn arkts_sources_are_checked() {
        let code = r#"
@Component
class Validator {
    pattern: RegExp = /(?<d>\d)|\k<d>/;
}
"#;
        let file = ParsedFile::from_source("Validator.ets", code);
        let diagnostics = NoUselessBackreference::new().check(&file);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].file, "Validator.ets");
    }

    #[test]
    fn cache_settings_do_not_change_results() {
        let code = r"const a = /(a)|\1/; const b = /(a)|\1/; const c = /\1(b)/;";
        let file = ParsedFile::from_source("test.js", code);
        let uncached = NoUselessBackreference::with_settings(RegexConfig {
            cache_capacity: 0,
            eviction: EvictionPolicy::OldestInserted,
        });
        let tiny_lru = NoUselessBackreference::with_settings(RegexConfig {
            cache_capacity: 1,
            eviction: EvictionPolicy::LeastRecentlyUsed,
        });

        let expected = NoUselessBackreference::new().check(&file);

        assert_eq!(expected.len(), 3);
        assert_eq!(uncached.check(&file), expected);
        assert_eq!(tiny_lru.check(&file), expected);
    }

    #[test]
    fn metadata_is_declared() {
        let rule = NoUselessBackreference::new();

        assert_eq!(rule.metadata().id, "Q040");
        assert_eq!(rule.metadata().name, "no-useless-backreference");
        assert!(rule.metadata().examples.unwrap().contains("// Good"));
        assert_eq!(rule.settings().cache_capacity, 256);
    }
}
