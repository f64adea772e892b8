//! Decides whether a backreference can ever match anything.
//!
//! Checks run in a fixed order and the first one that applies wins:
//! nested, backward, forward, disjunctive, then into-negative-lookaround.

use std::cell::OnceCell;
use std::ops::Range;

use super::AnalysisError;
use super::backrefs::{BackReference, BackReferenceTarget};
use super::groups::CaptureGroup;
use super::report::{UselessBackreference, UselessBackreferenceKind};
use super::structure::{
    Alternatives, Lookaround, LookaroundKind, branch_index, collect_alternatives,
    find_all_lookarounds, is_in_lookbehind_in,
};

/// Classifies the backreferences of one pattern.
///
/// Lookaround and alternation tables are only built if a check needs them.
pub struct Classifier<'p> {
    pattern: &'p str,
    groups: &'p [CaptureGroup],
    lookarounds: OnceCell<Vec<Lookaround>>,
    alternatives: OnceCell<Alternatives>,
}

impl<'p> Classifier<'p> {
    pub fn new(pattern: &'p str, groups: &'p [CaptureGroup]) -> Self {
        Self {
            pattern,
            groups,
            lookarounds: OnceCell::new(),
            alternatives: OnceCell::new(),
        }
    }

    /// The group a backreference points at. Named references resolve to the
    /// first group carrying that name.
    pub fn resolve(&self, backreference: &BackReference) -> Option<&'p CaptureGroup> {
        let groups: &'p [CaptureGroup] = self.groups;
        match &backreference.target {
            BackReferenceTarget::Number(number) => {
                groups.iter().find(|group| group.number == *number)
            }
            BackReferenceTarget::Name(name) => groups
                .iter()
                .find(|group| group.name.as_deref() == Some(name.as_str())),
        }
    }

    /// Classifies every backreference, keeping pattern order. Unresolved
    /// references are skipped.
    pub fn classify_all(
        &self,
        backreferences: &[BackReference],
    ) -> Result<Vec<UselessBackreference>, AnalysisError> {
        let mut violations = Vec::new();
        for backreference in backreferences {
            let Some(group) = self.resolve(backreference) else {
                continue;
            };
            if let Some(kind) = self.classify(group, backreference)? {
                violations.push(UselessBackreference::new(kind, backreference, group));
            }
        }
        Ok(violations)
    }

    /// `((a)\1)` is nested even though `(a)` closes first; `(a)(?!\1)` is useful.
    pub fn classify(
        &self,
        group: &CaptureGroup,
        backreference: &BackReference,
    ) -> Result<Option<UselessBackreferenceKind>, AnalysisError> {
        let group_span = self.checked_span(group.start, group.end)?;
        let ref_span = self.checked_span(backreference.index, backreference.end())?;

        if group_span.start < ref_span.start && ref_span.start < group_span.end {
            return Ok(Some(UselessBackreferenceKind::Nested));
        }

        let matching_backward = self.is_matching_backward(&group_span, &ref_span);

        if matching_backward && group_span.end <= ref_span.start {
            return Ok(Some(UselessBackreferenceKind::Backward));
        }
        if !matching_backward && ref_span.end <= group_span.start {
            return Ok(Some(UselessBackreferenceKind::Forward));
        }
        if self.in_different_alternatives(&group_span, &ref_span) {
            return Ok(Some(UselessBackreferenceKind::Disjunctive));
        }
        if self.group_in_negative_lookaround(&group_span, &ref_span) {
            return Ok(Some(UselessBackreferenceKind::IntoNegativeLookaround));
        }

        Ok(None)
    }

    fn checked_span(&self, start: usize, end: usize) -> Result<Range<usize>, AnalysisError> {
        let len = self.pattern.len();
        if start >= end || end > len {
            return Err(AnalysisError::SpanOutOfBounds { start, end, len });
        }
        for offset in [start, end] {
            if !self.pattern.is_char_boundary(offset) {
                return Err(AnalysisError::NotCharBoundary { offset });
            }
        }
        Ok(start..end)
    }

    fn lookarounds(&self) -> &[Lookaround] {
        self.lookarounds.get_or_init(|| find_all_lookarounds(self.pattern))
    }

    fn alternatives(&self) -> &Alternatives {
        self.alternatives.get_or_init(|| collect_alternatives(self.pattern))
    }

    /// Inside a lookbehind the engine matches right to left, so "before" and
    /// "after" swap. The innermost lookaround holding both spans decides.
    fn is_matching_backward(&self, group: &Range<usize>, reference: &Range<usize>) -> bool {
        let lookarounds = self.lookarounds();
        if !is_in_lookbehind_in(lookarounds, reference.start) {
            return false;
        }

        lookarounds
            .iter()
            .filter(|look| look.encloses(group) && look.encloses(reference))
            .max_by_key(|look| look.start)
            .is_some_and(|look| look.kind == LookaroundKind::Lookbehind)
    }

    fn in_different_alternatives(&self, group: &Range<usize>, reference: &Range<usize>) -> bool {
        let branches = self.alternatives().innermost_branches(&[group, reference]);
        match (
            branch_index(branches, group.start),
            branch_index(branches, reference.start),
        ) {
            (Some(left), Some(right)) => left != right,
            _ => false,
        }
    }

    fn group_in_negative_lookaround(&self, group: &Range<usize>, reference: &Range<usize>) -> bool {
        self.lookarounds()
            .iter()
            .any(|look| look.negative && look.encloses(group) && !look.encloses(reference))
    }
}
