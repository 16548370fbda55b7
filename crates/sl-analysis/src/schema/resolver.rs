//! Field descriptor resolution: inline literal, same-module helper,
//! shared-module helper (in that order)

use super::cache::{SharedSchemaCache, SharedSchemas};
use super::descriptor::{FieldDescriptor, SchemaFlags};
use crate::resolution::Resolution;
use sl_core::facts::FactsProvider;
use sl_core::syntax::{
    walk_block, walk_stmt, Expr, FuncDecl, Pos, SourceFile, Stmt, TypeExpr, Visitor,
};
use std::cell::OnceCell;
use std::collections::HashMap;

/// Resolves descriptors for the fields of one file's schema maps.
///
/// The shared cache is only consulted once a shared-module call is met, so
/// files that never call into the helper module never trigger its loading.
pub(crate) struct DescriptorResolver<'a> {
    facts: &'a dyn FactsProvider,
    file: &'a SourceFile,
    cache: &'a SharedSchemaCache,
    shared: OnceCell<SharedSchemas>,
}

impl<'a> DescriptorResolver<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsProvider,
        file: &'a SourceFile,
        cache: &'a SharedSchemaCache,
    ) -> Self {
        Self {
            facts,
            file,
            cache,
            shared: OnceCell::new(),
        }
    }

    pub(crate) fn resolve(
        &self,
        name: &str,
        value: &Expr,
        position: Pos,
    ) -> Resolution<FieldDescriptor> {
        self.resolve_flags(value)
            .map(|flags| FieldDescriptor::new(name, flags, position))
    }

    fn resolve_flags(&self, value: &Expr) -> Resolution<SchemaFlags> {
        if let Some((ty, elts, _)) = value.as_composite() {
            return if is_schema_literal_type(ty) {
                Resolution::Resolved(SchemaFlags::from_literal(elts))
            } else {
                Resolution::Unresolvable
            };
        }
        match value.unparen() {
            Expr::Call { fun, pos, .. } => self.resolve_call(fun, *pos),
            _ => Resolution::Unresolvable,
        }
    }

    fn resolve_call(&self, fun: &Expr, pos: Pos) -> Resolution<SchemaFlags> {
        let module = self.facts.module();
        if let Some(callee) = self.facts.callee_of(&self.file.path, pos) {
            if callee.method {
                return Resolution::Unresolvable;
            }
            if module.path == callee.module.as_str() {
                return self.same_module(&callee.name);
            }
            return self.shared(&format!("{}.{}", callee.module, callee.name));
        }

        match fun.unparen() {
            Expr::Ident { name, .. } => self.same_module(name),
            Expr::Selector { x, sel, .. } => {
                match x.as_ident().and_then(|alias| self.file.import_path(alias)) {
                    Some(path) => self.shared(&format!("{path}.{sel}")),
                    None => Resolution::Unresolvable,
                }
            }
            _ => Resolution::Unresolvable,
        }
    }

    fn same_module(&self, func: &str) -> Resolution<SchemaFlags> {
        self.facts
            .module()
            .func(func)
            .and_then(returned_schema_flags)
            .into()
    }

    fn shared(&self, key: &str) -> Resolution<SchemaFlags> {
        let schemas = self
            .shared
            .get_or_init(|| self.cache.get_or_load(self.facts.module()));
        schemas.get(key).cloned().into()
    }
}

/// `Schema`, `pkg.Schema`, a pointer to either, or an elided type
fn is_schema_literal_type(ty: Option<&TypeExpr>) -> bool {
    match ty {
        Some(ty) => matches!(ty.pointee(), TypeExpr::Named { name, .. } if name == "Schema"),
        None => true,
    }
}

/// Flags of the `Schema` literal a helper function returns.
///
/// Looks at the first `return` with a value. A literal is read directly; a
/// variable is followed back to its nearest preceding assignment, and only
/// when that assignment is itself a literal. Returns inside function literals
/// belong to those literals and are ignored.
pub(crate) fn returned_schema_flags(func: &FuncDecl) -> Option<SchemaFlags> {
    let body = func.body.as_ref()?;
    let mut finder = ReturnFinder {
        assigned: HashMap::new(),
        result: None,
    };
    walk_block(&mut finder, body);
    finder.result.flatten()
}

struct ReturnFinder<'a> {
    assigned: HashMap<&'a str, &'a Expr>,
    /// Outer `Some` once the first value-returning `return` was seen
    result: Option<Option<SchemaFlags>>,
}

impl ReturnFinder<'_> {
    fn literal_flags(expr: &Expr) -> Option<SchemaFlags> {
        let (ty, elts, _) = expr.as_composite()?;
        is_schema_literal_type(ty).then(|| SchemaFlags::from_literal(elts))
    }
}

impl<'a> Visitor<'a> for ReturnFinder<'a> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        if self.result.is_some() {
            return;
        }
        match stmt {
            Stmt::Assign { lhs, rhs, .. } if lhs.len() == rhs.len() => {
                for (target, value) in lhs.iter().zip(rhs) {
                    if let Some(name) = target.as_ident() {
                        self.assigned.insert(name, value);
                    }
                }
            }
            Stmt::Var(var) if var.names.len() == var.values.len() => {
                for (name, value) in var.names.iter().zip(&var.values) {
                    self.assigned.insert(name, value);
                }
            }
            Stmt::Return { results, .. } if !results.is_empty() => {
                let returned = &results[0];
                let flags = match returned.as_ident() {
                    Some(name) => self
                        .assigned
                        .get(name)
                        .and_then(|value| Self::literal_flags(value)),
                    None => Self::literal_flags(returned),
                };
                self.result = Some(flags);
                return;
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, _expr: &'a Expr) {}
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
