//! Visitor pattern for AST traversal.
//!
//! Provides a uniform way to traverse AST nodes with context information.

mod context;
mod traits;

pub use context::VisitorContext;
pub use traits::AstVisitor;

use std::ops::ControlFlow;

use swc_ecma_ast::{CallExpr, Module, NewExpr, Regex, VarDecl};
use swc_ecma_visit::{Visit, VisitWith};

struct Walker<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
    stopped: bool,
}

impl<V: AstVisitor> Walker<'_, V> {
    fn enter(&mut self, hook: impl FnOnce(&mut V, &VisitorContext) -> ControlFlow<()>) -> bool {
        if self.stopped {
            return false;
        }
        if hook(self.visitor, self.ctx).is_break() {
            self.stopped = true;
            return false;
        }
        true
    }
}

impl<V: AstVisitor> Visit for Walker<'_, V> {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        if self.enter(|v, ctx| v.visit_var_decl(node, ctx)) {
            node.visit_children_with(self);
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.enter(|v, ctx| v.visit_call_expr(node, ctx)) {
            node.visit_children_with(self);
        }
    }

    fn visit_new_expr(&mut self, node: &NewExpr) {
        if self.enter(|v, ctx| v.visit_new_expr(node, ctx)) {
            node.visit_children_with(self);
        }
    }

    fn visit_regex(&mut self, node: &Regex) {
        if self.enter(|v, ctx| v.visit_regex(node, ctx)) {
            node.visit_children_with(self);
        }
    }
}

pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker {
        visitor,
        ctx,
        stopped: false,
    };
    module.visit_with(&mut walker);
}
