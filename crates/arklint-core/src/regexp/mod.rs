//! Useless backreference detection for ECMAScript regular expressions.
//!
//! Works on the raw pattern text. A pattern is first checked by a real regex
//! engine; anything that does not compile is skipped. The scanners below then
//! index capture groups, backreferences, lookarounds and alternatives by byte
//! offset, and the classifier decides which backreferences can never match.

pub mod backrefs;
pub mod cache;
pub mod classifier;
pub mod groups;
pub mod oracle;
pub mod report;
pub mod scanner;
pub mod structure;

use tracing::{debug, trace};

pub use backrefs::{BackReference, BackReferenceTarget, compute_back_references};
pub use cache::{DEFAULT_CACHE_CAPACITY, EvictionPolicy, PatternCache, PatternTables};
pub use classifier::Classifier;
pub use groups::{CaptureGroup, GroupKind, compute_capture_groups};
pub use oracle::is_valid_pattern;
pub use report::{UselessBackreference, UselessBackreferenceKind};

/// An internal assumption about pattern structure did not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("span {start}..{end} lies outside a pattern of length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Finds useless backreferences, pattern by pattern.
///
/// Owns the cache of scan results, so one analyzer should live for one
/// file-check pass.
#[derive(Debug, Default)]
pub struct BackreferenceAnalyzer {
    cache: PatternCache,
}

impl BackreferenceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: PatternCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &PatternCache {
        &self.cache
    }

    /// Every useless backreference of `pattern`, in pattern order.
    ///
    /// Patterns the regex engine rejects yield nothing, as do patterns that
    /// trip an internal error.
    pub fn analyze(&mut self, pattern: &str, flags: &str) -> Vec<UselessBackreference> {
        if !pattern.contains('\\') {
            return Vec::new();
        }
        if !is_valid_pattern(pattern, flags) {
            trace!(pattern, flags, "skipping pattern that does not compile");
            return Vec::new();
        }

        match self.classify_pattern(pattern) {
            Ok(violations) => violations,
            Err(error) => {
                debug!(pattern, %error, "backreference analysis failed, skipping pattern");
                Vec::new()
            }
        }
    }

    /// Classifies without consulting the regex engine first.
    pub fn classify_pattern(
        &mut self,
        pattern: &str,
    ) -> Result<Vec<UselessBackreference>, AnalysisError> {
        let tables = self.cache.get_or_compute(pattern);
        if tables.backreferences.is_empty() || tables.groups.is_empty() {
            return Ok(Vec::new());
        }

        Classifier::new(pattern, &tables.groups).classify_all(&tables.backreferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(pattern: &str) -> Vec<UselessBackreferenceKind> {
        BackreferenceAnalyzer::new()
            .analyze(pattern, "")
            .into_iter()
            .map(|violation| violation.category)
            .collect()
    }

    #[test]
    fn patterns_without_backreferences_are_clean() {
        assert!(categories("(a)(b)|c").is_empty());
        assert!(categories("").is_empty());
        assert!(categories(r"\d+\.\w*").is_empty());
    }

    #[test]
    fn references_without_groups_are_ignored() {
        assert!(categories(r"a\1").is_empty());
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        assert!(categories(r"(\1").is_empty());
        assert!(categories(r"(a)|\1[").is_empty());
    }

    #[test]
    fn each_category_is_reported() {
        assert_eq!(categories(r"(\1)"), vec![UselessBackreferenceKind::Nested]);
        assert_eq!(categories(r"(\2)(b)"), vec![UselessBackreferenceKind::Forward]);
        assert_eq!(
            categories(r"(?<=(a)\1)"),
            vec![UselessBackreferenceKind::Backward]
        );
        assert_eq!(categories(r"(a)|\1"), vec![UselessBackreferenceKind::Disjunctive]);
        assert_eq!(
            categories(r"(?!(a))\1"),
            vec![UselessBackreferenceKind::IntoNegativeLookaround]
        );
    }

    #[test]
    fn repeated_analysis_is_stable() {
        let mut analyzer = BackreferenceAnalyzer::new();
        let pattern = r"\1(a)|(b)\2\k<c>(?<c>d)";

        let first = analyzer.analyze(pattern, "u");
        let second = analyzer.analyze(pattern, "u");

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(analyzer.cache().contains(pattern));
    }

    #[test]
    fn cache_settings_do_not_change_results() {
        let pattern = r"(a)|\1(?!(b))\2";
        let mut cached = BackreferenceAnalyzer::new();
        let mut uncached =
            BackreferenceAnalyzer::with_cache(PatternCache::new(0, EvictionPolicy::default()));

        assert_eq!(cached.analyze(pattern, ""), uncached.analyze(pattern, ""));
    }
}
