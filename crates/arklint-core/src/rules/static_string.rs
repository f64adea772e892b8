//! Folding of expressions whose value is a fixed string.
//!
//! Used to recover the pattern and flags handed to `RegExp(...)` when they are
//! written as literals, concatenations, or references to `const` bindings.

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use swc_ecma_ast::{BinaryOp, Expr, Lit, Pat, Tpl, VarDecl, VarDeclKind};

use crate::visitor::{AstVisitor, VisitorContext};

/// `const` bindings of a file that hold a static string.
///
/// A name bound more than once anywhere in the file is ambiguous and never
/// resolves.
#[derive(Debug, Default)]
pub struct ConstStrings {
    values: HashMap<String, String>,
    ambiguous: HashSet<String>,
}

impl ConstStrings {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The string `expr` always evaluates to, if it can be known statically.
    pub fn resolve(&self, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
            Expr::Tpl(tpl) => template_value(tpl),
            Expr::Paren(paren) => self.resolve(&paren.expr),
            Expr::TsAs(cast) => self.resolve(&cast.expr),
            Expr::TsConstAssertion(cast) => self.resolve(&cast.expr),
            Expr::TsNonNull(inner) => self.resolve(&inner.expr),
            Expr::Bin(bin) if bin.op == BinaryOp::Add => {
                let mut left = self.resolve(&bin.left)?;
                left.push_str(&self.resolve(&bin.right)?);
                Some(left)
            }
            Expr::Ident(ident) => self.get(ident.sym.as_ref()).map(str::to_string),
            _ => None,
        }
    }

    fn record(&mut self, name: &str, value: Option<String>) {
        if self.ambiguous.contains(name) {
            return;
        }
        if self.values.remove(name).is_some() {
            self.ambiguous.insert(name.to_string());
            return;
        }
        match value {
            Some(value) => {
                self.values.insert(name.to_string(), value);
            }
            None => {
                self.ambiguous.insert(name.to_string());
            }
        }
    }
}

/// Collects [`ConstStrings`] in source order, so a `const` can build on the
/// ones declared before it.
#[derive(Debug, Default)]
pub struct ConstStringCollector {
    strings: ConstStrings,
}

impl ConstStringCollector {
    pub fn finish(self) -> ConstStrings {
        self.strings
    }
}

impl AstVisitor for ConstStringCollector {
    fn visit_var_decl(&mut self, node: &VarDecl, _ctx: &VisitorContext) -> ControlFlow<()> {
        for declarator in &node.decls {
            let Pat::Ident(binding) = &declarator.name else {
                continue;
            };
            let value = match (node.kind, &declarator.init) {
                (VarDeclKind::Const, Some(init)) => self.strings.resolve(init),
                _ => None,
            };
            self.strings.record(binding.id.sym.as_ref(), value);
        }
        ControlFlow::Continue(())
    }
}

/// Cooked value of a template literal without substitutions. The parser
/// leaves `cooked` empty when an escape is malformed.
fn template_value(tpl: &Tpl) -> Option<String> {
    if !tpl.exprs.is_empty() {
        return None;
    }
    let quasi = tpl.quasis.first()?;
    quasi.cooked.as_ref().map(|cooked| cooked.to_string())
}
