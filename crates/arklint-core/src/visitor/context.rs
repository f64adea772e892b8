//! Visitor context providing file information during AST traversal.

use swc_common::{BytePos, Span};

use crate::parser::{ParsedFile, line_column};

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &ParsedFile {
        self.file
    }

    /// 1-based line and byte column of the start of `span`.
    pub fn span_to_location(&self, span: Span) -> (usize, usize) {
        self.pos_to_location(span.lo)
    }

    pub fn pos_to_location(&self, pos: BytePos) -> (usize, usize) {
        self.offset_to_location(self.file.offset_of(pos))
    }

    /// 1-based line and byte column of a byte offset into the source.
    pub fn offset_to_location(&self, offset: usize) -> (usize, usize) {
        line_column(self.file.source(), offset)
    }

    pub fn get_source_text(&self, span: Span) -> Option<&str> {
        let lo = self.file.offset_of(span.lo);
        let hi = self.file.offset_of(span.hi);
        self.file.source().get(lo..hi)
    }
}
