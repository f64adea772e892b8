//! Capture group extraction.
//!
//! Groups are numbered the way ECMAScript numbers them: by the position of
//! their opening parenthesis, counting only capturing and named-capturing
//! groups.

use serde::Serialize;

use super::scanner::StructuralChars;

/// What kind of construct a `(` opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Capturing,
    NamedCapturing,
    NonCapturing,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

impl GroupKind {
    pub fn is_capturing(self) -> bool {
        matches!(self, GroupKind::Capturing | GroupKind::NamedCapturing)
    }

    pub fn is_lookaround(self) -> bool {
        matches!(
            self,
            GroupKind::Lookahead
                | GroupKind::NegativeLookahead
                | GroupKind::Lookbehind
                | GroupKind::NegativeLookbehind
        )
    }

    pub fn is_negative_lookaround(self) -> bool {
        matches!(
            self,
            GroupKind::NegativeLookahead | GroupKind::NegativeLookbehind
        )
    }
}

/// Classifies the group opened by the unescaped `(` at `open`.
pub fn classify_group(pattern: &str, open: usize) -> GroupKind {
    let rest = pattern.as_bytes().get(open + 1..).unwrap_or_default();

    match rest {
        [b'?', b':', ..] => GroupKind::NonCapturing,
        [b'?', b'=', ..] => GroupKind::Lookahead,
        [b'?', b'!', ..] => GroupKind::NegativeLookahead,
        [b'?', b'<', b'=', ..] => GroupKind::Lookbehind,
        [b'?', b'<', b'!', ..] => GroupKind::NegativeLookbehind,
        [b'?', b'<', ..] => GroupKind::NamedCapturing,
        // Modifier groups such as `(?i:...)` or `(?-m:...)`.
        [b'?', ..] => GroupKind::NonCapturing,
        _ => GroupKind::Capturing,
    }
}

/// Offset of the first byte of the group body, past any `?:`, `?<=`,
/// `?<name>` or modifier prefix.
pub fn group_body_start(pattern: &str, open: usize) -> usize {
    let after_paren = open + 1;
    let bytes = pattern.as_bytes();

    match classify_group(pattern, open) {
        GroupKind::Capturing => after_paren,
        GroupKind::Lookahead | GroupKind::NegativeLookahead => after_paren + 2,
        GroupKind::Lookbehind | GroupKind::NegativeLookbehind => after_paren + 3,
        GroupKind::NamedCapturing => bytes[after_paren..]
            .iter()
            .position(|&b| b == b'>')
            .map_or(after_paren, |pos| after_paren + pos + 1),
        GroupKind::NonCapturing => bytes[after_paren..]
            .iter()
            .position(|&b| b == b':' || b == b')')
            .map_or(after_paren, |pos| {
                let index = after_paren + pos;
                if bytes[index] == b':' { index + 1 } else { index }
            }),
    }
}

/// Extracts the name of a `(?<name>...)` group from the group's own text.
fn group_name(full_match: &str) -> Option<String> {
    let rest = full_match.strip_prefix("(?<")?;
    if rest.starts_with('=') || rest.starts_with('!') {
        return None;
    }
    let end = rest.find('>')?;
    let name = &rest[..end];
    (!name.is_empty()).then(|| name.to_string())
}

/// One capturing group of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureGroup {
    /// Offset of the opening `(`.
    pub start: usize,
    /// Offset just past the closing `)`.
    pub end: usize,
    pub content: String,
    pub full_match: String,
    pub name: Option<String>,
    /// 1-based ordinal among capturing groups.
    pub number: usize,
}

impl CaptureGroup {
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// Builds the ordered list of capturing groups of `pattern`.
///
/// Numbers are handed out when a group opens, so `(a(b)c)` yields the outer
/// group as #1 even though the inner group closes first. Groups that are never
/// closed keep their number but produce no record.
pub fn compute_capture_groups(pattern: &str) -> Vec<CaptureGroup> {
    let mut open_stack: Vec<Option<(usize, usize)>> = Vec::new();
    let mut next_number = 0usize;
    let mut groups = Vec::new();

    for (index, byte) in StructuralChars::new(pattern) {
        match byte {
            b'(' => {
                if classify_group(pattern, index).is_capturing() {
                    next_number += 1;
                    open_stack.push(Some((index, next_number)));
                } else {
                    open_stack.push(None);
                }
            }
            b')' => {
                if let Some(Some((start, number))) = open_stack.pop() {
                    let end = index + 1;
                    let full_match = &pattern[start..end];
                    groups.push(CaptureGroup {
                        start,
                        end,
                        content: pattern[start + 1..index].to_string(),
                        full_match: full_match.to_string(),
                        name: group_name(full_match),
                        number,
                    });
                }
            }
            _ => {}
        }
    }

    groups.sort_by_key(|group| group.number);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_group_kinds() {
        assert_eq!(classify_group("(a)", 0), GroupKind::Capturing);
        assert_eq!(classify_group("(?:a)", 0), GroupKind::NonCapturing);
        assert_eq!(classify_group("(?=a)", 0), GroupKind::Lookahead);
        assert_eq!(classify_group("(?!a)", 0), GroupKind::NegativeLookahead);
        assert_eq!(classify_group("(?<=a)", 0), GroupKind::Lookbehind);
        assert_eq!(classify_group("(?<!a)", 0), GroupKind::NegativeLookbehind);
        assert_eq!(classify_group("(?<n>a)", 0), GroupKind::NamedCapturing);
        assert_eq!(classify_group("(?i:a)", 0), GroupKind::NonCapturing);
    }

    #[test]
    fn body_start_skips_prefixes() {
        assert_eq!(group_body_start("(a)", 0), 1);
        assert_eq!(group_body_start("(?:a)", 0), 3);
        assert_eq!(group_body_start("(?<=a)", 0), 4);
        assert_eq!(group_body_start("(?<year>a)", 0), 8);
        assert_eq!(group_body_start("(?i-m:a)", 0), 6);
    }

    #[test]
    fn numbering_follows_open_paren_order() {
        let groups = compute_capture_groups("(a(b)c)");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].number, 1);
        assert_eq!(groups[0].full_match, "(a(b)c)");
        assert_eq!(groups[0].content, "a(b)c");
        assert_eq!(groups[1].number, 2);
        assert_eq!(groups[1].full_match, "(b)");
        assert_eq!((groups[1].start, groups[1].end), (2, 5));
    }

    #[test]
    fn deeply_nested_numbering() {
        let groups = compute_capture_groups("((a)(b(c)))(d)");
        let texts: Vec<_> = groups.iter().map(|g| g.full_match.as_str()).collect();

        assert_eq!(texts, vec!["((a)(b(c)))", "(a)", "(b(c))", "(c)", "(d)"]);
        assert!(groups.iter().enumerate().all(|(i, g)| g.number == i + 1));
    }

    #[test]
    fn non_capturing_and_lookarounds_are_not_numbered() {
        let groups = compute_capture_groups("(?:a)(?=b)(?!c)(?<=d)(?<!e)(f)");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].number, 1);
        assert_eq!(groups[0].full_match, "(f)");
    }

    #[test]
    fn capture_inside_non_capturing_group() {
        let groups = compute_capture_groups("(?:x(y))");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].full_match, "(y)");
        assert_eq!(groups[0].start, 4);
    }

    #[test]
    fn named_group_records_name() {
        let groups = compute_capture_groups("(?<year>\\d{4})-(\\d{2})");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name.as_deref(), Some("year"));
        assert!(groups[0].is_named());
        assert_eq!(groups[1].name, None);
        assert_eq!(groups[1].number, 2);
    }

    #[test]
    fn escaped_parentheses_are_not_groups() {
        assert!(compute_capture_groups(r"\(a\)").is_empty());
    }

    #[test]
    fn parentheses_in_character_class_are_not_groups() {
        assert!(compute_capture_groups("[(a)]").is_empty());
    }

    #[test]
    fn unclosed_group_is_dropped() {
        let groups = compute_capture_groups("(a(b)");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].number, 2);
    }
}
