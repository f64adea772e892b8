//! Structural queries over a pattern: group spans, lookarounds, and
//! alternation branches.
//!
//! All queries re-scan the pattern and return pattern-relative offsets. The
//! slice-based helpers (`*_in`) let a caller that already holds the scan
//! results answer several questions without scanning again.

use std::ops::Range;

use super::groups::{GroupKind, classify_group, group_body_start};
use super::scanner::{StructuralChars, find_closing_parenthesis};

/// The span of one parenthesised construct, capturing or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpan {
    pub start: usize,
    pub end: usize,
    pub kind: GroupKind,
}

impl GroupSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether `offset` lies strictly between the group's parentheses.
    pub fn contains(&self, offset: usize) -> bool {
        self.start < offset && offset + 1 < self.end
    }

    /// Whether the whole of `span` lies strictly between the parentheses.
    pub fn encloses(&self, span: &Range<usize>) -> bool {
        encloses(&self.range(), span)
    }
}

/// Whether `inner` lies strictly inside the parentheses of the group `outer`.
pub(crate) fn encloses(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start < inner.start && inner.end < outer.end
}

/// Every closed group of `pattern`, ordered by opening offset.
pub fn find_all_groups(pattern: &str) -> Vec<GroupSpan> {
    StructuralChars::new(pattern)
        .filter(|&(_, byte)| byte == b'(')
        .filter_map(|(open, _)| {
            let close = find_closing_parenthesis(pattern, open)?;
            Some(GroupSpan {
                start: open,
                end: close.end,
                kind: classify_group(pattern, open),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookaroundKind {
    Lookahead,
    Lookbehind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookaround {
    pub start: usize,
    pub end: usize,
    pub kind: LookaroundKind,
    pub negative: bool,
}

impl Lookaround {
    fn from_group(group: &GroupSpan) -> Option<Self> {
        let (kind, negative) = match group.kind {
            GroupKind::Lookahead => (LookaroundKind::Lookahead, false),
            GroupKind::NegativeLookahead => (LookaroundKind::Lookahead, true),
            GroupKind::Lookbehind => (LookaroundKind::Lookbehind, false),
            GroupKind::NegativeLookbehind => (LookaroundKind::Lookbehind, true),
            _ => return None,
        };
        Some(Self {
            start: group.start,
            end: group.end,
            kind,
            negative,
        })
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start < offset && offset + 1 < self.end
    }

    pub fn encloses(&self, span: &Range<usize>) -> bool {
        encloses(&self.range(), span)
    }
}

/// Every `(?=`, `(?!`, `(?<=` and `(?<!` construct, ordered by opening offset.
pub fn find_all_lookarounds(pattern: &str) -> Vec<Lookaround> {
    find_all_groups(pattern)
        .iter()
        .filter_map(Lookaround::from_group)
        .collect()
}

/// Splits `region` of `pattern` on the `|` characters that sit at nesting
/// depth zero relative to the region.
pub fn split_alternatives(pattern: &str, region: Range<usize>) -> Vec<Range<usize>> {
    let Some(slice) = pattern.get(region.clone()) else {
        return Vec::new();
    };

    let mut branches = Vec::new();
    let mut branch_start = region.start;
    let mut depth = 0usize;

    for (index, byte) in StructuralChars::new(slice) {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => {
                let split = region.start + index;
                branches.push(branch_start..split);
                branch_start = split + 1;
            }
            _ => {}
        }
    }

    branches.push(branch_start..region.end);
    branches
}

/// The alternation branches of one group's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAlternatives {
    /// Span of the whole group, parentheses included.
    pub group: Range<usize>,
    pub kind: GroupKind,
    pub branches: Vec<Range<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternatives {
    /// Branches of the whole pattern.
    pub top_level: Vec<Range<usize>>,
    /// Branches of every group, in opening order.
    pub nested: Vec<GroupAlternatives>,
}

impl Alternatives {
    /// Branches of the innermost construct (group or whole pattern) that
    /// strictly encloses every span in `spans`.
    pub fn innermost_branches(&self, spans: &[&Range<usize>]) -> &[Range<usize>] {
        self.nested
            .iter()
            .filter(|alt| spans.iter().all(|span| encloses(&alt.group, span)))
            .max_by_key(|alt| alt.group.start)
            .map_or(self.top_level.as_slice(), |alt| alt.branches.as_slice())
    }
}

/// Index of the branch containing `offset`.
pub fn branch_index(branches: &[Range<usize>], offset: usize) -> Option<usize> {
    branches
        .iter()
        .position(|branch| branch.start <= offset && offset < branch.end)
}

/// Collects the top-level branches and, group by group, the branches of
/// every nested group.
pub fn collect_alternatives(pattern: &str) -> Alternatives {
    let whole = 0..pattern.len();
    let mut nested = Vec::new();
    collect_nested_alternatives(pattern, whole.clone(), &mut nested);
    nested.sort_by_key(|alt| alt.group.start);

    Alternatives {
        top_level: split_alternatives(pattern, whole),
        nested,
    }
}

/// Records the groups found at depth zero of `region`, then recurses into
/// each group's body. Offsets found while scanning the region's slice are
/// re-biased by `region.start`.
fn collect_nested_alternatives(
    pattern: &str,
    region: Range<usize>,
    out: &mut Vec<GroupAlternatives>,
) {
    let Some(slice) = pattern.get(region.clone()) else {
        return;
    };

    let mut resume_at = 0usize;
    for (local_open, byte) in StructuralChars::new(slice) {
        if byte != b'(' || local_open < resume_at {
            continue;
        }
        let Some(close) = find_closing_parenthesis(slice, local_open) else {
            continue;
        };

        let start = region.start + local_open;
        let end = region.start + close.end;
        let body = region.start + group_body_start(slice, local_open)..end - 1;

        out.push(GroupAlternatives {
            group: start..end,
            kind: classify_group(slice, local_open),
            branches: split_alternatives(pattern, body.clone()),
        });
        collect_nested_alternatives(pattern, body, out);
        resume_at = close.end;
    }
}

/// Innermost group of the given kind whose parentheses strictly surround
/// `offset`.
#[cfg(test)]
pub(crate) fn find_enclosing_group_in(
    groups: &[GroupSpan],
    offset: usize,
    kind: GroupKind,
) -> Option<GroupSpan> {
    groups
        .iter()
        .filter(|group| group.kind == kind && group.contains(offset))
        .max_by_key(|group| group.start)
        .copied()
}

/// Innermost `(?:...)` group surrounding `offset`, if any.
#[cfg(test)]
pub(crate) fn find_enclosing_non_capturing_group(
    pattern: &str,
    offset: usize,
) -> Option<Range<usize>> {
    find_enclosing_group_in(&find_all_groups(pattern), offset, GroupKind::NonCapturing)
        .map(|group| group.range())
}

pub fn is_in_lookbehind_in(lookarounds: &[Lookaround], offset: usize) -> bool {
    lookarounds
        .iter()
        .any(|look| look.kind == LookaroundKind::Lookbehind && look.contains(offset))
}

/// Whether `offset` lies inside a `(?<=...)` or `(?<!...)` construct.
#[cfg(test)]
pub(crate) fn is_in_lookbehind(pattern: &str, offset: usize) -> bool {
    is_in_lookbehind_in(&find_all_lookarounds(pattern), offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_group_kind() {
        let groups = find_all_groups("(a)(?:b)(?=c)");

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].range(), 0..3);
        assert_eq!(groups[1].kind, GroupKind::NonCapturing);
        assert_eq!(groups[2].kind, GroupKind::Lookahead);
    }

    #[test]
    fn lookarounds_report_direction_and_polarity() {
        let looks = find_all_lookarounds("(?=a)(?!b)(?<=c)(?<!d)(e)");

        assert_eq!(looks.len(), 4);
        assert_eq!(
            (looks[0].kind, looks[0].negative),
            (LookaroundKind::Lookahead, false)
        );
        assert_eq!(
            (looks[1].kind, looks[1].negative),
            (LookaroundKind::Lookahead, true)
        );
        assert_eq!(
            (looks[2].kind, looks[2].negative),
            (LookaroundKind::Lookbehind, false)
        );
        assert_eq!(
            (looks[3].kind, looks[3].negative),
            (LookaroundKind::Lookbehind, true)
        );
        assert_eq!(looks[3].range(), 16..22);
    }

    #[test]
    fn nested_lookarounds_are_all_found() {
        let looks = find_all_lookarounds("(?<=x(?=y(?!z)))");

        assert_eq!(looks.len(), 3);
        assert_eq!(looks[0].range(), 0..16);
        assert_eq!(looks[1].range(), 5..15);
        assert_eq!(looks[2].range(), 9..14);
    }

    #[test]
    fn top_level_alternatives() {
        let alts = collect_alternatives("a|(b|c)|d");

        assert_eq!(alts.top_level, vec![0..1, 2..7, 8..9]);
    }

    #[test]
    fn nested_alternatives_are_rebased() {
        let alts = collect_alternatives("x(a|b(?:c|d))");

        assert_eq!(alts.nested.len(), 2);
        assert_eq!(alts.nested[0].group, 1..13);
        assert_eq!(alts.nested[0].branches, vec![2..3, 4..12]);
        assert_eq!(alts.nested[1].group, 5..12);
        assert_eq!(alts.nested[1].kind, GroupKind::NonCapturing);
        assert_eq!(alts.nested[1].branches, vec![8..9, 10..11]);
    }

    #[test]
    fn pipes_in_classes_and_escapes_do_not_split() {
        let alts = collect_alternatives(r"a[|]\|b");

        assert_eq!(alts.top_level, vec![0..7]);
    }

    #[test]
    fn innermost_branches_picks_deepest_common_group() {
        let alts = collect_alternatives("(a|(b)|c)");
        let left = 1..2;
        let right = 7..8;

        let branches = alts.innermost_branches(&[&left, &right]);

        assert_eq!(branches, &[1..2, 3..6, 7..8]);
        assert_eq!(branch_index(branches, 1), Some(0));
        assert_eq!(branch_index(branches, 7), Some(2));
    }

    #[test]
    fn innermost_branches_falls_back_to_top_level() {
        let alts = collect_alternatives("(a)|b");
        let group = 0..3;
        let other = 4..5;

        assert_eq!(alts.innermost_branches(&[&group, &other]), &[0..3, 4..5]);
    }

    #[test]
    fn enclosing_non_capturing_group_is_innermost() {
        let pattern = "(?:a(?:b)c)";

        assert_eq!(find_enclosing_non_capturing_group(pattern, 6), Some(4..9));
        assert_eq!(find_enclosing_non_capturing_group(pattern, 3), Some(0..11));
        assert_eq!(find_enclosing_non_capturing_group(pattern, 11), None);
    }

    #[test]
    fn enclosing_non_capturing_group_ignores_other_kinds() {
        assert_eq!(find_enclosing_non_capturing_group("(a)(?=b)", 1), None);
    }

    #[test]
    fn lookbehind_membership() {
        let pattern = "(?<=(a))b(?<!c)";

        assert!(is_in_lookbehind(pattern, 5));
        assert!(!is_in_lookbehind(pattern, 8));
        assert!(is_in_lookbehind(pattern, 13));
        assert!(!is_in_lookbehind("(?=a)", 3));
    }
}
