//! Inline disable comment directives for suppressing diagnostics
//!
//! - `// arklint-disable-next-line Q040` disables Q040 on the following line
//! - `// arklint-disable-line Q040` disables Q040 on the comment's own line
//! - without ids, every rule is disabled on the target line
//! - several ids are separated by commas; block comments work the same way

use std::collections::HashMap;

const DISABLE_NEXT_LINE: &str = "arklint-disable-next-line";
const DISABLE_LINE: &str = "arklint-disable-line";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisableDirective {
    pub line: usize,
    pub rule_ids: Vec<String>,
}

impl DisableDirective {
    pub fn new(line: usize, rule_ids: Vec<String>) -> Self {
        Self { line, rule_ids }
    }

    pub fn for_all_rules(line: usize) -> Self {
        Self::new(line, Vec::new())
    }

    pub fn disables_all(&self) -> bool {
        self.rule_ids.is_empty()
    }

    pub fn disables_rule(&self, rule_id: &str) -> bool {
        self.disables_all() || self.rule_ids.iter().any(|id| id == rule_id)
    }

    fn merge(&mut self, other: DisableDirective) {
        if self.disables_all() || other.disables_all() {
            self.rule_ids.clear();
        } else {
            self.rule_ids.extend(other.rule_ids);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisableDirectives {
    by_line: HashMap<usize, DisableDirective>,
}

impl DisableDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: &str) -> Self {
        let mut directives = Self::new();

        for (line_idx, line) in source.lines().enumerate() {
            let line_num = line_idx + 1;
            let Some(comment) = comment_body(line) else {
                continue;
            };

            let (target_line, rule_ids) =
                if let Some(rest) = comment.strip_prefix(DISABLE_NEXT_LINE) {
                    (line_num + 1, parse_rule_ids(rest))
                } else if let Some(rest) = comment.strip_prefix(DISABLE_LINE) {
                    (line_num, parse_rule_ids(rest))
                } else {
                    continue;
                };

            if let Some(rule_ids) = rule_ids {
                directives.add(DisableDirective::new(target_line, rule_ids));
            }
        }

        directives
    }

    /// Adds a directive, combining it with any directive already on that line.
    pub fn add(&mut self, directive: DisableDirective) {
        match self.by_line.get_mut(&directive.line) {
            Some(existing) => existing.merge(directive),
            None => {
                self.by_line.insert(directive.line, directive);
            }
        }
    }

    pub fn is_disabled(&self, line: usize, rule_id: &str) -> bool {
        self.by_line
            .get(&line)
            .is_some_and(|d| d.disables_rule(rule_id))
    }

    pub fn directives(&self) -> impl Iterator<Item = &DisableDirective> {
        self.by_line.values()
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.len()
    }
}

/// Text of the first `//` or `/* */` comment on the line, trimmed.
fn comment_body(line: &str) -> Option<&str> {
    let start = match (line.find("//"), line.find("/*")) {
        (Some(l), Some(b)) => l.min(b),
        (Some(l), None) => l,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    let after = &line[start + 2..];
    let body = if line[start..].starts_with("/*") {
        after.find("*/").map_or(after, |end| &after[..end])
    } else {
        after
    };
    Some(body.trim())
}

/// Rule ids following a directive keyword. `None` when the keyword is only
/// the prefix of a longer word, as in `arklint-disable-lines`.
fn parse_rule_ids(rest: &str) -> Option<Vec<String>> {
    if rest.starts_with(|c: char| !c.is_whitespace()) {
        return None;
    }

    Some(
        rest.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}
