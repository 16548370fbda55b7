//! Syntax model for the subset of Go that provider schema definitions use.
//!
//! Trees are produced by an external facts exporter and deserialized from
//! JSON; nothing in this crate parses Go source text. The model keeps only
//! what the schema checks look at: declarations, statements that can bind or
//! commit values, and the expression shapes that appear in schema literals.

use crate::module_path::ModulePath;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Line/column position inside one source file (both 1-based)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// One analyzed module (a Go package): its import path, directory and files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub path: ModulePath,
    pub dir: PathBuf,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl Module {
    /// Find a top-level (receiver-less) function declared in any file of the module
    pub fn func(&self, name: &str) -> Option<&FuncDecl> {
        self.files
            .iter()
            .flat_map(|f| f.funcs())
            .find(|func| func.receiver.is_none() && func.name == name)
    }

    /// Find a named type declaration anywhere in the module
    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.files.iter().find_map(|f| f.type_decl(name))
    }

    /// Directory the module's first file lives in, falling back to `dir`
    pub fn source_dir(&self) -> &Path {
        self.files
            .first()
            .and_then(|f| f.path.parent())
            .unwrap_or(self.dir.as_path())
    }
}

/// A single source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: String,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// File name component of the path, or the empty string
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Resolve a local package name (alias or default name) to its import path
    pub fn import_path(&self, local_name: &str) -> Option<&str> {
        self.imports
            .iter()
            .find(|i| i.local_name() == local_name)
            .map(|i| i.path.as_str())
    }

    /// All function declarations in the file, in source order
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(func) => Some(func),
            _ => None,
        })
    }

    /// All type declarations in the file, in source order
    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Type(ty) => Some(ty),
            _ => None,
        })
    }

    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.type_decls().find(|t| t.name == name)
    }
}

/// An import spec, optionally renamed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
}

impl Import {
    /// The name the importing file uses for this package.
    ///
    /// Without an explicit alias this is the last path segment, skipping a
    /// trailing major-version segment such as `v2`.
    pub fn local_name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        let mut segments = self.path.rsplit('/');
        let last = segments.next().unwrap_or_default();
        let is_version = last.len() > 1
            && last.starts_with('v')
            && last[1..].chars().all(|c| c.is_ascii_digit());
        if is_version {
            segments.next().unwrap_or(last)
        } else {
            last
        }
    }
}

/// Top-level declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    Var(VarDecl),
}

/// Function or method declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    #[serde(default)]
    pub receiver: Option<Receiver>,
    #[serde(default)]
    pub body: Option<Block>,
    #[serde(default)]
    pub pos: Pos,
}

impl FuncDecl {
    /// Exported functions start with an upper-case letter
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(|c| c.is_uppercase())
    }
}

/// Method receiver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receiver {
    #[serde(default)]
    pub name: Option<String>,
    pub ty: TypeExpr,
}

/// Named type declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub ty: TypeExpr,
    #[serde(default)]
    pub pos: Pos,
}

/// Package-level `var` declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub names: Vec<String>,
    #[serde(default)]
    pub ty: Option<TypeExpr>,
    #[serde(default)]
    pub values: Vec<Expr>,
    #[serde(default)]
    pub pos: Pos,
}

/// Type expression as written in source (or as reported by the facts provider,
/// in which case `package` holds the full import path instead of the local name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Named {
        #[serde(default)]
        package: Option<String>,
        name: String,
    },
    Pointer {
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Slice {
        elem: Box<TypeExpr>,
    },
    Struct {
        #[serde(default)]
        fields: Vec<StructField>,
    },
    Func,
    Interface,
}

impl TypeExpr {
    /// Convenience constructor for a named type
    pub fn named(package: Option<&str>, name: &str) -> Self {
        TypeExpr::Named {
            package: package.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Strip one level of pointer indirection
    pub fn pointee(&self) -> &TypeExpr {
        match self {
            TypeExpr::Pointer { elem } => elem,
            other => other,
        }
    }

    /// Whether this is the predeclared `string` type
    pub fn is_string(&self) -> bool {
        matches!(self, TypeExpr::Named { package: None, name } if name == "string")
    }
}

/// Struct field with its optional raw tag (without the surrounding backquotes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: TypeExpr,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Statement block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

/// Statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `a, b = x, y` or `a := x` (`define` set for `:=`)
    Assign {
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
        #[serde(default)]
        define: bool,
        #[serde(default)]
        pos: Pos,
    },
    /// `var a, b T = x, y`
    Var(VarDecl),
    Expr {
        expr: Expr,
    },
    Return {
        #[serde(default)]
        results: Vec<Expr>,
        #[serde(default)]
        pos: Pos,
    },
    If {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        cond: Expr,
        then: Block,
        #[serde(default)]
        otherwise: Option<Box<Stmt>>,
    },
    For {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        post: Option<Box<Stmt>>,
        body: Block,
    },
    Range {
        #[serde(default)]
        key: Option<Expr>,
        #[serde(default)]
        value: Option<Expr>,
        x: Expr,
        body: Block,
    },
    Switch {
        #[serde(default)]
        init: Option<Box<Stmt>>,
        #[serde(default)]
        tag: Option<Expr>,
        #[serde(default)]
        cases: Vec<CaseClause>,
    },
    Block(Block),
    Defer {
        call: Expr,
    },
    Go {
        call: Expr,
    },
    /// Statements the model does not describe (labels, branches, ...)
    Other,
}

/// One `case` of a switch statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseClause {
    #[serde(default)]
    pub exprs: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

/// Kind of a basic literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitKind {
    String,
    Int,
    Float,
    Char,
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `&x`
    Addr,
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `<-x`
    Recv,
}

/// Expression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Ident {
        name: String,
        #[serde(default)]
        pos: Pos,
    },
    /// Basic literal; string values are stored unquoted
    Lit {
        lit: LitKind,
        value: String,
        #[serde(default)]
        pos: Pos,
    },
    Selector {
        x: Box<Expr>,
        sel: String,
        #[serde(default)]
        pos: Pos,
    },
    Call {
        fun: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        pos: Pos,
    },
    /// Composite literal; `ty` is `None` when elided inside an outer literal
    Composite {
        #[serde(default)]
        ty: Option<TypeExpr>,
        #[serde(default)]
        elts: Vec<Element>,
        #[serde(default)]
        pos: Pos,
    },
    Unary {
        op: UnaryOp,
        x: Box<Expr>,
    },
    /// `*x`, either a dereference or a pointer type in expression position
    Star {
        x: Box<Expr>,
    },
    Binary {
        op: String,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    Paren {
        x: Box<Expr>,
    },
    TypeAssert {
        x: Box<Expr>,
        #[serde(default)]
        ty: Option<TypeExpr>,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    FuncLit {
        body: Block,
        #[serde(default)]
        pos: Pos,
    },
    Other,
}

/// Element of a composite literal: `value` or `key: value`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub key: Option<Expr>,
    pub value: Expr,
}

impl Expr {
    /// Strip any number of enclosing parentheses
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren { x } = expr {
            expr = x;
        }
        expr
    }

    /// Name of a bare identifier
    pub fn as_ident(&self) -> Option<&str> {
        match self.unparen() {
            Expr::Ident { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Unquoted value of a string literal
    pub fn string_value(&self) -> Option<&str> {
        match self.unparen() {
            Expr::Lit {
                lit: LitKind::String,
                value,
                ..
            } => Some(value),
            _ => None,
        }
    }

    /// Whether this is the predeclared identifier `true`
    pub fn is_true(&self) -> bool {
        self.as_ident() == Some("true")
    }

    /// Name of the called function: the identifier or the selected member
    pub fn callee_name(&self) -> Option<&str> {
        match self.unparen() {
            Expr::Ident { name, .. } => Some(name),
            Expr::Selector { sel, .. } => Some(sel),
            _ => None,
        }
    }

    /// Source position for expression kinds that record one
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Expr::Ident { pos, .. }
            | Expr::Lit { pos, .. }
            | Expr::Selector { pos, .. }
            | Expr::Call { pos, .. }
            | Expr::Composite { pos, .. }
            | Expr::FuncLit { pos, .. } => Some(*pos),
            Expr::Paren { x } => x.pos(),
            _ => None,
        }
    }

    /// The composite literal behind `{...}` or `&T{...}`
    pub fn as_composite(&self) -> Option<(Option<&TypeExpr>, &[Element], Pos)> {
        match self.unparen() {
            Expr::Composite { ty, elts, pos } => Some((ty.as_ref(), elts.as_slice(), *pos)),
            Expr::Unary {
                op: UnaryOp::Addr,
                x,
            } => match x.unparen() {
                Expr::Composite { ty, elts, pos } => Some((ty.as_ref(), elts.as_slice(), *pos)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Element {
    /// Name of an identifier key (`Required: true` → `Required`)
    pub fn key_ident(&self) -> Option<&str> {
        self.key.as_ref().and_then(Expr::as_ident)
    }
}

/// Syntax tree visitor with pre-order default traversal.
///
/// Override a `visit_*` method to inspect a node kind, and call the matching
/// `walk_*` function to keep descending. Function literal bodies are visited
/// like any other block.
pub trait Visitor<'a> {
    fn visit_stmt(&mut self, stmt: &'a Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'a Expr) {
        walk_expr(self, expr);
    }

    fn visit_element(&mut self, element: &'a Element) {
        walk_element(self, element);
    }
}

/// Visit every declaration of a file
pub fn walk_file<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, file: &'a SourceFile) {
    for decl in &file.decls {
        match decl {
            Decl::Func(func) => {
                if let Some(body) = &func.body {
                    walk_block(visitor, body);
                }
            }
            Decl::Var(var) => {
                for value in &var.values {
                    visitor.visit_expr(value);
                }
            }
            Decl::Type(_) => {}
        }
    }
}

pub fn walk_block<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, block: &'a Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, stmt: &'a Stmt) {
    match stmt {
        Stmt::Assign { lhs, rhs, .. } => {
            for expr in lhs.iter().chain(rhs) {
                visitor.visit_expr(expr);
            }
        }
        Stmt::Var(var) => {
            for value in &var.values {
                visitor.visit_expr(value);
            }
        }
        Stmt::Expr { expr } => visitor.visit_expr(expr),
        Stmt::Return { results, .. } => {
            for expr in results {
                visitor.visit_expr(expr);
            }
        }
        Stmt::If {
            init,
            cond,
            then,
            otherwise,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            visitor.visit_expr(cond);
            walk_block(visitor, then);
            if let Some(otherwise) = otherwise {
                visitor.visit_stmt(otherwise);
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(cond) = cond {
                visitor.visit_expr(cond);
            }
            if let Some(post) = post {
                visitor.visit_stmt(post);
            }
            walk_block(visitor, body);
        }
        Stmt::Range {
            key,
            value,
            x,
            body,
        } => {
            for expr in key.iter().chain(value.iter()) {
                visitor.visit_expr(expr);
            }
            visitor.visit_expr(x);
            walk_block(visitor, body);
        }
        Stmt::Switch { init, tag, cases } => {
            if let Some(init) = init {
                visitor.visit_stmt(init);
            }
            if let Some(tag) = tag {
                visitor.visit_expr(tag);
            }
            for case in cases {
                for expr in &case.exprs {
                    visitor.visit_expr(expr);
                }
                for stmt in &case.body {
                    visitor.visit_stmt(stmt);
                }
            }
        }
        Stmt::Block(block) => walk_block(visitor, block),
        Stmt::Defer { call } | Stmt::Go { call } => visitor.visit_expr(call),
        Stmt::Other => {}
    }
}

pub fn walk_expr<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, expr: &'a Expr) {
    match expr {
        Expr::Ident { .. } | Expr::Lit { .. } | Expr::Other => {}
        Expr::Selector { x, .. }
        | Expr::Unary { x, .. }
        | Expr::Star { x }
        | Expr::Paren { x }
        | Expr::TypeAssert { x, .. } => visitor.visit_expr(x),
        Expr::Call { fun, args, .. } => {
            visitor.visit_expr(fun);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Composite { elts, .. } => {
            for element in elts {
                visitor.visit_element(element);
            }
        }
        Expr::Binary { x, y, .. } => {
            visitor.visit_expr(x);
            visitor.visit_expr(y);
        }
        Expr::Index { x, index } => {
            visitor.visit_expr(x);
            visitor.visit_expr(index);
        }
        Expr::FuncLit { body, .. } => walk_block(visitor, body),
    }
}

pub fn walk_element<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, element: &'a Element) {
    if let Some(key) = &element.key {
        visitor.visit_expr(key);
    }
    visitor.visit_expr(&element.value);
}

#[cfg(test)]
#[path = "syntax_test.rs"]
mod tests;
