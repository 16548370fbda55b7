//! ID provenance: which schema fields compose a resource's identifier.
//!
//! The trace is shallow. Inside one function it records which
//! variables hold a configuration field and which hold an identifier built by
//! a `New*ID`/`Parse*ID` constructor, then resolves the argument of every
//! `SetID`/`SetId` call against those two tables. Identifiers assembled from
//! API responses, from helper functions or across files are not followed; such
//! commit calls resolve to nothing and the definition is skipped.

use super::model_mapping::ModelFieldMapping;
use crate::resolution::Resolution;
use sl_core::config::{Config, FileSuffixes};
use sl_core::syntax::{walk_expr, walk_stmt, Block, Expr, FuncDecl, SourceFile, Stmt, Visitor};
use std::collections::HashMap;

/// Name fragments of scope arguments (subscription, tenant) that never map to
/// a schema field
const SCOPE_HINTS: &[&str] = &["subscription", "tenant", "subid"];

/// Kind of definition a source file declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Resource,
    DataSource,
}

impl DefinitionKind {
    /// Classify a file by name; `None` for files that are neither
    pub fn of_file(file_name: &str, suffixes: &FileSuffixes) -> Option<Self> {
        if file_name.ends_with(suffixes.resource.as_str()) {
            Some(DefinitionKind::Resource)
        } else if file_name.ends_with(suffixes.data_source.as_str()) {
            Some(DefinitionKind::DataSource)
        } else {
            None
        }
    }

    /// Functions whose name contains this fragment commit the identifier
    fn entry_fragment(self) -> &'static str {
        match self {
            DefinitionKind::Resource => "Create",
            DefinitionKind::DataSource => "Read",
        }
    }
}

/// Traces identifier composition through create/read functions
pub struct IdProvenanceTracer<'a> {
    mapping: &'a ModelFieldMapping,
    accessor_receivers: &'a [String],
    commit_receivers: &'a [String],
}

impl<'a> IdProvenanceTracer<'a> {
    pub fn new(mapping: &'a ModelFieldMapping, config: &'a Config) -> Self {
        Self {
            mapping,
            accessor_receivers: &config.accessor_receivers,
            commit_receivers: &config.commit_receivers,
        }
    }

    /// Identifier fields of the definition in `file`, in constructor argument
    /// order (least specific first), de-duplicated across commit calls
    pub fn trace_file(&self, file: &SourceFile, kind: DefinitionKind) -> Resolution<Vec<String>> {
        let mut commits = 0;
        let mut fields: Vec<String> = Vec::new();

        let candidates = file
            .funcs()
            .filter(|func| func.name.contains(kind.entry_fragment()));
        for func in candidates {
            let trace = self.trace_function(func);
            commits += trace.len();
            for resolved in trace.into_iter().filter_map(Resolution::resolved) {
                for field in resolved {
                    push_unique(&mut fields, field);
                }
            }
        }

        match (commits, fields.is_empty()) {
            (0, _) => Resolution::NotApplicable,
            (_, true) => Resolution::Unresolvable,
            (_, false) => Resolution::Resolved(fields),
        }
    }

    /// One resolution per commit call in the function, in source order.
    ///
    /// Function literals in the body are part of the trace.
    pub fn trace_function(&self, func: &FuncDecl) -> Vec<Resolution<Vec<String>>> {
        let Some(body) = &func.body else {
            return Vec::new();
        };
        let bindings = Bindings::collect(self, body);

        let mut finder = CommitFinder {
            receivers: self.commit_receivers,
            args: Vec::new(),
        };
        for stmt in &body.stmts {
            finder.visit_stmt(stmt);
        }

        finder
            .args
            .into_iter()
            .map(|arg| match arg {
                Some(arg) => bindings.resolve_commit(self, arg),
                None => Resolution::Unresolvable,
            })
            .collect()
    }

    /// `d.Get("x")`, `d.GetOk("x")` (optionally type-asserted) or a tagged
    /// typed-model member
    fn field_read(&self, expr: &Expr) -> Option<String> {
        let expr = match expr.unparen() {
            Expr::TypeAssert { x, .. } => x.unparen(),
            other => other,
        };
        match expr {
            Expr::Call { fun, args, .. } => {
                let Expr::Selector { x, sel, .. } = fun.unparen() else {
                    return None;
                };
                let receiver = x.as_ident()?;
                let is_accessor = (sel == "Get" || sel == "GetOk")
                    && self.accessor_receivers.iter().any(|r| r == receiver);
                if !is_accessor {
                    return None;
                }
                args.first()?.string_value().map(str::to_string)
            }
            Expr::Selector { sel, .. } => self.mapping.schema_name(sel).map(str::to_string),
            _ => None,
        }
    }
}

/// Per-function variable tables
#[derive(Debug, Default)]
struct Bindings<'a> {
    /// Variable → configuration field it holds
    fields: HashMap<&'a str, String>,
    /// Variable → identifier fields of the constructor call it holds
    ids: HashMap<&'a str, Resolution<Vec<String>>>,
    /// `Parse*ID` variable → the single field its parsed value came from
    parents: HashMap<&'a str, Resolution<String>>,
}

impl<'a> Bindings<'a> {
    fn collect(tracer: &IdProvenanceTracer<'_>, body: &'a Block) -> Self {
        let mut collector = BindingCollector {
            tracer,
            bindings: Bindings::default(),
        };
        for stmt in &body.stmts {
            collector.visit_stmt(stmt);
        }
        collector.bindings
    }

    fn bind(&mut self, tracer: &IdProvenanceTracer<'_>, name: &'a str, value: &Expr) {
        if let Some(field) = tracer.field_read(value) {
            self.fields.insert(name, field);
            return;
        }
        let Expr::Call { fun, args, .. } = value.unparen() else {
            return;
        };
        let Some(kind) = fun.callee_name().and_then(ConstructorKind::of) else {
            return;
        };
        let fields = self.resolve_args(tracer, args);
        if kind == ConstructorKind::Parse {
            let parent = match &fields {
                Resolution::Resolved(fields) if fields.len() == 1 => {
                    Resolution::Resolved(fields[0].clone())
                }
                _ => Resolution::Unresolvable,
            };
            self.parents.insert(name, parent);
        }
        self.ids.insert(name, fields);
    }

    /// Field names for the arguments of an identifier constructor.
    ///
    /// Member accesses on a parsed parent identifier stand for the one field
    /// that identifier was parsed from. An unresolved scope argument in first
    /// position is dropped; any other unresolved argument makes the whole call
    /// unresolvable.
    fn resolve_args(
        &self,
        tracer: &IdProvenanceTracer<'_>,
        args: &[Expr],
    ) -> Resolution<Vec<String>> {
        let mut fields = Vec::new();
        for (index, arg) in args.iter().enumerate() {
            if let Some(parent) = self.parent_member(arg) {
                match parent {
                    Resolution::Resolved(field) => push_unique(&mut fields, field.clone()),
                    _ => return Resolution::Unresolvable,
                }
                continue;
            }
            match self.field_of(tracer, arg) {
                Some(field) => push_unique(&mut fields, field),
                None if index == 0 && is_scope_argument(arg) => {}
                None => return Resolution::Unresolvable,
            }
        }
        Resolution::Resolved(fields)
    }

    fn field_of(&self, tracer: &IdProvenanceTracer<'_>, expr: &Expr) -> Option<String> {
        tracer.field_read(expr).or_else(|| {
            expr.as_ident()
                .and_then(|name| self.fields.get(name))
                .cloned()
        })
    }

    /// Parent binding for `parentId.Member`
    fn parent_member(&self, expr: &Expr) -> Option<&Resolution<String>> {
        match expr.unparen() {
            Expr::Selector { x, .. } => self.parents.get(x.as_ident()?),
            _ => None,
        }
    }

    fn resolve_commit(
        &self,
        tracer: &IdProvenanceTracer<'_>,
        arg: &Expr,
    ) -> Resolution<Vec<String>> {
        match arg.unparen() {
            Expr::Ident { name, .. } => self.variable_ids(name),
            Expr::Call { fun, args, .. } => {
                if fun.callee_name().and_then(ConstructorKind::of).is_some() {
                    return self.resolve_args(tracer, args);
                }
                match fun.unparen() {
                    Expr::Selector { x, sel, .. }
                        if args.is_empty() && (sel == "ID" || sel == "String") =>
                    {
                        match x.as_ident() {
                            Some(name) => self.variable_ids(name),
                            None => Resolution::Unresolvable,
                        }
                    }
                    _ => Resolution::Unresolvable,
                }
            }
            _ => Resolution::Unresolvable,
        }
    }

    fn variable_ids(&self, name: &str) -> Resolution<Vec<String>> {
        if let Some(ids) = self.ids.get(name) {
            return ids.clone();
        }
        match self.fields.get(name) {
            Some(field) => Resolution::Resolved(vec![field.clone()]),
            None => Resolution::Unresolvable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstructorKind {
    New,
    Parse,
}

impl ConstructorKind {
    fn of(name: &str) -> Option<Self> {
        if !name.ends_with("ID") {
            None
        } else if name.starts_with("New") {
            Some(ConstructorKind::New)
        } else if name.starts_with("Parse") {
            Some(ConstructorKind::Parse)
        } else {
            None
        }
    }
}

struct BindingCollector<'a, 't> {
    tracer: &'t IdProvenanceTracer<'t>,
    bindings: Bindings<'a>,
}

impl<'a> Visitor<'a> for BindingCollector<'a, '_> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Assign { lhs, rhs, .. } => {
                // `v, err := f(...)` binds the first target to the call
                if rhs.len() == 1 {
                    if let Some(name) = lhs.first().and_then(Expr::as_ident) {
                        self.bindings.bind(self.tracer, name, &rhs[0]);
                    }
                } else {
                    for (target, value) in lhs.iter().zip(rhs) {
                        if let Some(name) = target.as_ident() {
                            self.bindings.bind(self.tracer, name, value);
                        }
                    }
                }
            }
            Stmt::Var(var) => {
                for (name, value) in var.names.iter().zip(&var.values) {
                    self.bindings.bind(self.tracer, name, value);
                }
            }
            _ => {}
        }
        walk_stmt(self, stmt);
    }
}

/// Collects the argument of every commit call (`None` when the call does
/// not have exactly one argument)
struct CommitFinder<'a, 'r> {
    receivers: &'r [String],
    args: Vec<Option<&'a Expr>>,
}

impl<'a> Visitor<'a> for CommitFinder<'a, '_> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Call { fun, args, .. } = expr {
            if let Expr::Selector { x, sel, .. } = fun.unparen() {
                let is_commit = (sel == "SetID" || sel == "SetId")
                    && x
                        .as_ident()
                        .is_some_and(|r| self.receivers.iter().any(|c| c == r));
                if is_commit {
                    self.args.push(match args.as_slice() {
                        [arg] => Some(arg),
                        _ => None,
                    });
                }
            }
        }
        walk_expr(self, expr);
    }
}

fn is_scope_argument(expr: &Expr) -> bool {
    let name = match expr.unparen() {
        Expr::Ident { name, .. } => name,
        Expr::Selector { sel, .. } => sel,
        _ => return false,
    };
    let lower = name.to_lowercase();
    SCOPE_HINTS.iter().any(|hint| lower.contains(hint))
}

fn push_unique(fields: &mut Vec<String>, field: String) {
    if !fields.contains(&field) {
        fields.push(field);
    }
}

#[cfg(test)]
#[path = "provenance_test.rs"]
mod tests;
