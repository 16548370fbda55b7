//! Shared test utilities for sl-analysis
//!
//! Builders for the syntax model, so tests can describe Go definitions
//! without a facts export on disk.

use crate::context::AnalysisContext;
use crate::schema::{FieldDescriptor, SchemaFlags};
use sl_core::syntax::{
    Block, Decl, Element, Expr, FuncDecl, Import, LitKind, Module, Pos, Receiver, SourceFile,
    Stmt, StructField, TypeDecl, TypeExpr, UnaryOp,
};
use sl_core::{Config, ModulePath};
use std::path::PathBuf;

pub const PLUGINSDK: &str = "github.com/hashicorp/terraform-provider-azurerm/internal/tf/pluginsdk";
pub const COMMONSCHEMA: &str = "github.com/hashicorp/go-azure-helpers/resourcemanager/commonschema";

pub fn ident(name: &str) -> Expr {
    Expr::Ident {
        name: name.to_string(),
        pos: Pos::default(),
    }
}

pub fn str_lit(value: &str) -> Expr {
    Expr::Lit {
        lit: LitKind::String,
        value: value.to_string(),
        pos: Pos::default(),
    }
}

pub fn selector(x: Expr, sel: &str) -> Expr {
    Expr::Selector {
        x: Box::new(x),
        sel: sel.to_string(),
        pos: Pos::default(),
    }
}

/// `pkg.Sel`
pub fn pkg_sel(pkg: &str, sel: &str) -> Expr {
    selector(ident(pkg), sel)
}

pub fn call(fun: Expr, args: Vec<Expr>) -> Expr {
    call_at(fun, args, Pos::default())
}

pub fn call_at(fun: Expr, args: Vec<Expr>, pos: Pos) -> Expr {
    Expr::Call {
        fun: Box::new(fun),
        args,
        pos,
    }
}

/// `recv.method(args...)`
pub fn method_call(recv: &str, method: &str, args: Vec<Expr>) -> Expr {
    call(pkg_sel(recv, method), args)
}

/// `d.Get("field").(string)`
pub fn d_get(field: &str) -> Expr {
    Expr::TypeAssert {
        x: Box::new(method_call("d", "Get", vec![str_lit(field)])),
        ty: Some(TypeExpr::named(None, "string")),
    }
}

/// Identifier-keyed element (`Required: true`)
pub fn kv(key: &str, value: Expr) -> Element {
    Element {
        key: Some(ident(key)),
        value,
    }
}

/// `&pluginsdk.Schema{Type: pluginsdk.TypeString, <Flag>: true, ...}`.
///
/// Flags are `required`, `optional`, `computed` and `force_new`.
pub fn schema_lit(flags: &[&str]) -> Expr {
    let mut elts = vec![kv("Type", pkg_sel("pluginsdk", "TypeString"))];
    for flag in flags {
        let key = match *flag {
            "required" => "Required",
            "optional" => "Optional",
            "computed" => "Computed",
            "force_new" => "ForceNew",
            other => panic!("unknown schema flag {other}"),
        };
        elts.push(kv(key, ident("true")));
    }
    schema_lit_with(elts)
}

/// `&pluginsdk.Schema{...}` with explicit elements
pub fn schema_lit_with(elts: Vec<Element>) -> Expr {
    Expr::Unary {
        op: UnaryOp::Addr,
        x: Box::new(Expr::Composite {
            ty: Some(TypeExpr::named(Some("pluginsdk"), "Schema")),
            elts,
            pos: Pos::default(),
        }),
    }
}

/// Written type `map[string]*pluginsdk.Schema`
pub fn schema_map_type() -> TypeExpr {
    TypeExpr::Map {
        key: Box::new(TypeExpr::named(None, "string")),
        value: Box::new(TypeExpr::Pointer {
            elem: Box::new(TypeExpr::named(Some("pluginsdk"), "Schema")),
        }),
    }
}

/// `map[string]*pluginsdk.Schema{"a": ..., "b": ...}` at `line`
pub fn schema_map_at(line: u32, entries: Vec<(&str, Expr)>) -> Expr {
    Expr::Composite {
        ty: Some(schema_map_type()),
        elts: entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, value))| Element {
                key: Some(Expr::Lit {
                    lit: LitKind::String,
                    value: name.to_string(),
                    pos: Pos::new(line + 1 + i as u32, 3),
                }),
                value,
            })
            .collect(),
        pos: Pos::new(line, 9),
    }
}

pub fn schema_map(entries: Vec<(&str, Expr)>) -> Expr {
    schema_map_at(10, entries)
}

/// `name := value`
pub fn define(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        lhs: vec![ident(name)],
        rhs: vec![value],
        define: true,
        pos: Pos::default(),
    }
}

/// `a, b := value`
pub fn define2(a: &str, b: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        lhs: vec![ident(a), ident(b)],
        rhs: vec![value],
        define: true,
        pos: Pos::default(),
    }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr { expr }
}

pub fn ret(expr: Expr) -> Stmt {
    Stmt::Return {
        results: vec![expr],
        pos: Pos::default(),
    }
}

pub fn func_lit(stmts: Vec<Stmt>) -> Expr {
    Expr::FuncLit {
        body: Block { stmts },
        pos: Pos::default(),
    }
}

pub fn func(name: &str, stmts: Vec<Stmt>) -> Decl {
    Decl::Func(FuncDecl {
        name: name.to_string(),
        receiver: None,
        body: Some(Block { stmts }),
        pos: Pos::default(),
    })
}

/// Method with a value receiver `r <recv_type>`
pub fn method(recv_type: &str, name: &str, stmts: Vec<Stmt>) -> Decl {
    Decl::Func(FuncDecl {
        name: name.to_string(),
        receiver: Some(Receiver {
            name: Some("r".to_string()),
            ty: TypeExpr::named(None, recv_type),
        }),
        body: Some(Block { stmts }),
        pos: Pos::default(),
    })
}

/// `type <name> struct { ... }` from (member, tfschema name) pairs
pub fn model_struct(name: &str, members: &[(&str, &str)]) -> Decl {
    Decl::Type(TypeDecl {
        name: name.to_string(),
        ty: TypeExpr::Struct {
            fields: members
                .iter()
                .map(|(member, schema)| StructField {
                    name: member.to_string(),
                    ty: TypeExpr::named(None, "string"),
                    tag: Some(format!("tfschema:\"{schema}\"")),
                })
                .collect(),
        },
        pos: Pos::default(),
    })
}

/// Source file importing pluginsdk and commonschema
pub fn source_file(path: &str, decls: Vec<Decl>) -> SourceFile {
    SourceFile {
        path: PathBuf::from(path),
        package: "example".to_string(),
        imports: vec![
            Import {
                name: None,
                path: PLUGINSDK.to_string(),
            },
            Import {
                name: None,
                path: COMMONSCHEMA.to_string(),
            },
        ],
        decls,
    }
}

pub fn module(path: &str, dir: &str, files: Vec<SourceFile>) -> Module {
    Module {
        path: ModulePath::new(path),
        dir: PathBuf::from(dir),
        files,
    }
}

/// Descriptor with the given flags (see [`schema_lit`] for flag names)
pub fn descriptor(name: &str, flags: &[&str]) -> FieldDescriptor {
    let flags = SchemaFlags {
        required: flags.contains(&"required"),
        optional: flags.contains(&"optional"),
        computed: flags.contains(&"computed"),
        force_new: flags.contains(&"force_new"),
        ..SchemaFlags::default()
    };
    FieldDescriptor::new(name, flags, Pos::default())
}

/// Configuration that reports every file, new or not
pub fn test_config() -> Config {
    Config {
        new_files_only: false,
        ..Config::default()
    }
}

/// In-memory context with a fresh shared cache and an all-changed scope
pub fn make_ctx() -> AnalysisContext {
    AnalysisContext::with_config(test_config())
}
