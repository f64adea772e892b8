//! Backreference discovery.

use serde::Serialize;

use super::scanner::is_escaped;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BackReferenceTarget {
    Number(usize),
    Name(String),
}

/// A `\N` or `\k<name>` found outside any character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackReference {
    /// Offset of the backslash.
    pub index: usize,
    /// The literal text, e.g. `\2` or `\k<foo>`.
    pub value: String,
    pub target: BackReferenceTarget,
}

impl BackReference {
    pub fn is_named(&self) -> bool {
        matches!(self.target, BackReferenceTarget::Name(_))
    }

    /// Offset just past the backreference text.
    pub fn end(&self) -> usize {
        self.index + self.value.len()
    }
}

fn is_group_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Tries to read a backreference starting at the backslash at `index`.
fn match_back_reference(pattern: &str, index: usize) -> Option<BackReference> {
    let rest = pattern.get(index + 1..)?;

    if let Some(named) = rest.strip_prefix("k<") {
        let close = named.find('>')?;
        let name = &named[..close];
        if name.is_empty() || !name.chars().all(is_group_name_char) {
            return None;
        }
        let len = 1 + "k<".len() + close + 1;
        return Some(BackReference {
            index,
            value: pattern[index..index + len].to_string(),
            target: BackReferenceTarget::Name(name.to_string()),
        });
    }

    // `\0` is the NUL escape, never a backreference.
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || rest.starts_with('0') {
        return None;
    }
    let number = rest[..digits].parse().ok()?;

    Some(BackReference {
        index,
        value: pattern[index..index + 1 + digits].to_string(),
        target: BackReferenceTarget::Number(number),
    })
}

/// Lists every backreference of `pattern` in textual order.
///
/// Backslash sequences inside `[...]` are literal characters and never
/// produce a backreference.
pub fn compute_back_references(pattern: &str) -> Vec<BackReference> {
    let bytes = pattern.as_bytes();
    let mut references = Vec::new();
    let mut in_char_class = false;
    let mut index = 0;

    while index < bytes.len() {
        let byte = bytes[index];

        if in_char_class {
            if byte == b']' && !is_escaped(pattern, index) {
                in_char_class = false;
            }
            index += 1;
            continue;
        }

        match byte {
            b'[' if !is_escaped(pattern, index) => {
                in_char_class = true;
                index += 1;
            }
            b'\\' if !is_escaped(pattern, index) => match match_back_reference(pattern, index) {
                Some(reference) => {
                    index = reference.end();
                    references.push(reference);
                }
                None => index += 1,
            },
            _ => index += 1,
        }
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_numeric_references() {
        let refs = compute_back_references(r"(a)(b)\1\2");

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].index, 6);
        assert_eq!(refs[0].value, r"\1");
        assert_eq!(refs[0].target, BackReferenceTarget::Number(1));
        assert_eq!(refs[1].index, 8);
        assert!(!refs[1].is_named());
    }

    #[test]
    fn multi_digit_reference_is_one_token() {
        let refs = compute_back_references(r"\12x");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, r"\12");
        assert_eq!(refs[0].target, BackReferenceTarget::Number(12));
        assert_eq!(refs[0].end(), 3);
    }

    #[test]
    fn finds_named_reference() {
        let refs = compute_back_references(r"(?<word>\w+)\s\k<word>");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, r"\k<word>");
        assert!(refs[0].is_named());
        assert_eq!(
            refs[0].target,
            BackReferenceTarget::Name("word".to_string())
        );
    }

    #[test]
    fn character_class_contents_are_literal() {
        assert!(compute_back_references(r"[\1]").is_empty());
        assert!(compute_back_references(r"[a\]\1]").is_empty());
    }

    #[test]
    fn reference_after_character_class_is_found() {
        let refs = compute_back_references(r"(a)[\1]\1");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].index, 7);
    }

    #[test]
    fn escaped_backslash_is_not_a_reference() {
        assert!(compute_back_references(r"\\1").is_empty());
        assert_eq!(compute_back_references(r"\\\1").len(), 1);
    }

    #[test]
    fn escaped_bracket_does_not_open_class() {
        let refs = compute_back_references(r"(a)\[\1");

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].index, 5);
    }

    #[test]
    fn nul_escape_and_other_escapes_are_ignored() {
        assert!(compute_back_references(r"\0\d\w\k").is_empty());
        assert!(compute_back_references(r"\k<>").is_empty());
    }
}
