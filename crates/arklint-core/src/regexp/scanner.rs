//! Low-level character classification over raw regex pattern text.
//!
//! Every helper here works on byte offsets. All structural characters of the
//! regex grammar are ASCII, so an offset returned by these helpers is always a
//! valid `char` boundary of the pattern.

/// Returns `true` when the byte at `index` is preceded by an odd number of
/// contiguous backslashes.
pub fn is_escaped(pattern: &str, index: usize) -> bool {
    let bytes = pattern.as_bytes();
    let mut cursor = index.min(bytes.len());
    let mut backslashes = 0usize;

    while cursor > 0 && bytes[cursor - 1] == b'\\' {
        backslashes += 1;
        cursor -= 1;
    }

    backslashes % 2 == 1
}

/// Returns `true` when `pattern[index]` is `expected` and not escaped.
pub fn is_unescaped(pattern: &str, index: usize, expected: u8) -> bool {
    pattern.as_bytes().get(index) == Some(&expected) && !is_escaped(pattern, index)
}

/// Returns the offset just past the `]` that closes the character class
/// opened at `open`, or the pattern length when the class is unterminated.
pub fn character_class_end(pattern: &str, open: usize) -> usize {
    let bytes = pattern.as_bytes();
    let mut index = open + 1;

    while index < bytes.len() {
        if bytes[index] == b']' && !is_escaped(pattern, index) {
            return index + 1;
        }
        index += 1;
    }

    bytes.len()
}

/// Iterator over the structural bytes of a pattern: bytes that are neither
/// escaped, nor a backslash, nor part of a character class.
pub struct StructuralChars<'p> {
    pattern: &'p str,
    position: usize,
}

impl<'p> StructuralChars<'p> {
    pub fn new(pattern: &'p str) -> Self {
        Self::starting_at(pattern, 0)
    }

    /// Starts scanning at `position`, which must not lie inside a character
    /// class.
    pub fn starting_at(pattern: &'p str, position: usize) -> Self {
        Self { pattern, position }
    }
}

impl Iterator for StructuralChars<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.pattern.as_bytes();

        while self.position < bytes.len() {
            let index = self.position;
            let byte = bytes[index];

            if is_escaped(self.pattern, index) {
                self.position += 1;
                continue;
            }

            match byte {
                b'\\' => self.position += 1,
                b'[' => self.position = character_class_end(self.pattern, index),
                _ => {
                    self.position += 1;
                    return Some((index, byte));
                }
            }
        }

        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosingParen<'p> {
    /// Offset just past the matching `)`.
    pub end: usize,
    /// Text strictly between the two parentheses.
    pub content: &'p str,
}

/// Finds the `)` balancing the `(` at `open`.
///
/// Every unescaped parenthesis outside a character class counts towards the
/// nesting depth, whatever kind of group it opens. Returns `None` when `open`
/// is not an unescaped `(` or the group is never closed.
pub fn find_closing_parenthesis(pattern: &str, open: usize) -> Option<ClosingParen<'_>> {
    if !is_unescaped(pattern, open, b'(') {
        return None;
    }

    let mut depth = 1usize;
    for (index, byte) in StructuralChars::starting_at(pattern, open + 1) {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(ClosingParen {
                        end: index + 1,
                        content: &pattern[open + 1..index],
                    });
                }
            }
            _ => {}
        }
    }

    None
}
