//! Plain text formatter, one line per diagnostic

use arklint_core::diagnostic::Diagnostic;
use std::fmt::Write;

pub fn format(diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    for diag in diagnostics {
        let _ = writeln!(output, "{diag}");
        if let Some(suggestion) = &diag.suggestion {
            let _ = writeln!(output, "  suggestion: {suggestion}");
        }
    }
    output
}
