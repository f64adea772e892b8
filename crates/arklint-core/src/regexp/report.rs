//! Violation records and their rendered messages.

use std::fmt;

use serde::Serialize;

use super::backrefs::BackReference;
use super::groups::CaptureGroup;

/// Why a backreference can never match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UselessBackreferenceKind {
    /// The reference sits inside the group it refers to.
    Nested,
    /// The group appears after the reference.
    Forward,
    /// Both are in a lookbehind and the group appears before the reference.
    Backward,
    /// The group and the reference are in different alternatives.
    Disjunctive,
    /// The group is inside a negative lookaround that the reference is not.
    IntoNegativeLookaround,
}

impl UselessBackreferenceKind {
    pub const ALL: [UselessBackreferenceKind; 5] = [
        UselessBackreferenceKind::Nested,
        UselessBackreferenceKind::Forward,
        UselessBackreferenceKind::Backward,
        UselessBackreferenceKind::Disjunctive,
        UselessBackreferenceKind::IntoNegativeLookaround,
    ];

    pub fn message_id(self) -> &'static str {
        match self {
            UselessBackreferenceKind::Nested => "nested",
            UselessBackreferenceKind::Forward => "forward",
            UselessBackreferenceKind::Backward => "backward",
            UselessBackreferenceKind::Disjunctive => "disjunctive",
            UselessBackreferenceKind::IntoNegativeLookaround => "intoNegativeLookaround",
        }
    }

    fn reason(self) -> &'static str {
        match self {
            UselessBackreferenceKind::Nested => "from within that group",
            UselessBackreferenceKind::Forward => "which appears later in the pattern",
            UselessBackreferenceKind::Backward => "which appears before in the same lookbehind",
            UselessBackreferenceKind::Disjunctive => "which is in another alternative",
            UselessBackreferenceKind::IntoNegativeLookaround => {
                "which is in a negative lookaround"
            }
        }
    }
}

impl fmt::Display for UselessBackreferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_id())
    }
}

/// One useless backreference, in the order it occurs in the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UselessBackreference {
    pub category: UselessBackreferenceKind,
    pub backreference_text: String,
    /// Text between the group's parentheses.
    pub group_content: String,
    /// The whole group, parentheses included.
    pub group_text: String,
    /// Pattern offset of the backreference's backslash.
    pub offset: usize,
}

impl UselessBackreference {
    pub fn new(
        category: UselessBackreferenceKind,
        backreference: &BackReference,
        group: &CaptureGroup,
    ) -> Self {
        Self {
            category,
            backreference_text: backreference.value.clone(),
            group_content: group.content.clone(),
            group_text: group.full_match.clone(),
            offset: backreference.index,
        }
    }

    /// Length of the backreference text in the pattern.
    pub fn len(&self) -> usize {
        self.backreference_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backreference_text.is_empty()
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UselessBackreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Backreference '{}' will be ignored. It references group '{}' {}.",
            self.backreference_text,
            self.group_text,
            self.category.reason()
        )
    }
}
