//! Parser module for ArkTS, TypeScript and JavaScript source code
//!
//! Integrates with SWC for parsing source files into AST.

use std::ops::Range;
use std::sync::OnceLock;

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceFile, SourceMap, Spanned};
use swc_ecma_parser::error::Error as SwcError;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};
use tracing::debug;

use crate::disable_comments::DisableDirectives;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    ArkTs,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        "ets" => Language::ArkTs,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    /// 1-based byte column.
    pub column: usize,
    /// Byte offsets into the source text.
    pub span: Range<usize>,
    pub message: String,
}

impl ParseError {
    fn from_swc(error: &SwcError, code: &str, base: BytePos) -> Self {
        let span = error.span();
        let start = offset_from(base, span.lo);
        let (line, column) = line_column(code, start);
        Self {
            line,
            column,
            span: start..offset_from(base, span.hi),
            message: error.kind().msg().to_string(),
        }
    }
}

/// 1-based line and byte column of `offset` in `source`. Offsets past the end
/// map to the end of the text.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);

    (line, prefix.len() - line_start + 1)
}

fn offset_from(base: BytePos, pos: BytePos) -> usize {
    pos.0.saturating_sub(base.0) as usize
}

#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    /// Position swc assigned to the first byte of the source.
    pub base: BytePos,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    base: BytePos,
    line_ranges: OnceLock<Vec<Range<usize>>>,
    disable_directives: DisableDirectives,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let parse_result = Parser::for_file(filename).parse_module_recovering(source);
        let disable_directives = DisableDirectives::from_source(source);

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        debug!(
            filename,
            ?language,
            errors = parse_result.errors.len(),
            "parsed source file"
        );

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count,
            has_errors: parse_result.has_errors(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module: parse_result.module,
            errors: parse_result.errors,
            base: parse_result.base,
            line_ranges: OnceLock::new(),
            disable_directives,
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn disable_directives(&self) -> &DisableDirectives {
        &self.disable_directives
    }

    /// Byte offset into [`ParsedFile::source`] of a position in the AST.
    pub fn offset_of(&self, pos: BytePos) -> usize {
        offset_from(self.base, pos).min(self.source.len())
    }

    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        if line_number == 0 {
            return None;
        }

        let ranges = self.line_ranges.get_or_init(|| self.build_line_ranges());
        ranges
            .get(line_number - 1)
            .and_then(|range| self.source.get(range.clone()))
    }

    fn build_line_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;

        for (i, c) in self.source.char_indices() {
            if c == '\n' {
                ranges.push(start..i);
                start = i + 1;
            }
        }

        if start < self.source.len() {
            ranges.push(start..self.source.len());
        }

        ranges
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder().typescript(true).jsx(true).build(),
            // ArkTS components lean on decorators (`@Entry`, `@Component`, `@State`).
            Language::ArkTs => Self::builder().typescript(true).decorators(true).build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    fn source_file(source_map: &SourceMap, code: &str) -> Lrc<SourceFile> {
        source_map.new_source_file(FileName::Custom("input".into()).into(), code.to_string())
    }

    pub fn parse_module(&self, code: &str) -> Result<Module, ParseError> {
        let mut result = self.parse_module_recovering(code);
        match result.module {
            Some(module) if result.errors.is_empty() => Ok(module),
            _ => {
                let message = "parser produced no module".to_string();
                Err(if result.errors.is_empty() {
                    ParseError {
                        line: 1,
                        column: 1,
                        span: 0..0,
                        message,
                    }
                } else {
                    result.errors.swap_remove(0)
                })
            }
        }
    }

    /// Parses a module, collecting recoverable errors instead of stopping
    /// at the first one.
    pub fn parse_module_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = Self::source_file(&source_map, code);
        let base = fm.start_pos;

        let mut recovered_errors = Vec::new();
        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let mut errors: Vec<ParseError> = recovered_errors
            .iter()
            .map(|e| ParseError::from_swc(e, code, base))
            .collect();

        match result {
            Ok(module) => ParseResult {
                module: Some(module),
                errors,
                base,
            },
            Err(e) => {
                errors.push(ParseError::from_swc(&e, code, base));
                ParseResult {
                    module: None,
                    errors,
                    base,
                }
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
