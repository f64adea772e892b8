//! Syntax check against a real ECMAScript regex engine.

use tracing::trace;

/// Flag letters that change how a pattern parses. Others (`g`, `y`, `d`)
/// are irrelevant to syntax.
const SYNTAX_FLAGS: &[char] = &['i', 'm', 's', 'u', 'v'];

/// Whether `pattern` compiles as an ECMAScript regex under `flags`.
///
/// Unknown or duplicated flag letters are dropped rather than rejected,
/// since flags may come from a best-effort guess.
pub fn is_valid_pattern(pattern: &str, flags: &str) -> bool {
    let mut syntax_flags = String::new();
    for flag in flags.chars().filter(|flag| SYNTAX_FLAGS.contains(flag)) {
        if !syntax_flags.contains(flag) {
            syntax_flags.push(flag);
        }
    }

    match regress::Regex::with_flags(pattern, syntax_flags.as_str()) {
        Ok(_) => true,
        Err(error) => {
            trace!(pattern, flags, ?error, "pattern rejected by regex engine");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_patterns() {
        assert!(is_valid_pattern(r"(a)\1", ""));
        assert!(is_valid_pattern(r"(?<=(a)\1)b", ""));
        assert!(is_valid_pattern(r"(?<year>\d{4})-\k<year>", "g"));
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(!is_valid_pattern("(a", ""));
        assert!(!is_valid_pattern("a)", ""));
        assert!(!is_valid_pattern("[a", ""));
    }

    #[test]
    fn ignores_flags_that_do_not_affect_syntax() {
        assert!(is_valid_pattern("a", "gyd"));
        assert!(is_valid_pattern("a", "ii"));
    }
}
