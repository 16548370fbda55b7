use super::*;
use crate::test_utils::*;
use sl_core::syntax::{Decl, Pos, TypeExpr, VarDecl};

fn trace(decls: Vec<Decl>, kind: DefinitionKind, mapping: &ModelFieldMapping) -> Resolution<Vec<String>> {
    let config = Config::default();
    let file = source_file("/src/internal/services/foo/foo_resource.go", decls);
    IdProvenanceTracer::new(mapping, &config).trace_file(&file, kind)
}

fn trace_resource(stmts: Vec<Stmt>) -> Resolution<Vec<String>> {
    trace(
        vec![func("resourceFooCreate", stmts)],
        DefinitionKind::Resource,
        &ModelFieldMapping::default(),
    )
}

fn resolved(fields: &[&str]) -> Resolution<Vec<String>> {
    Resolution::Resolved(fields.iter().map(|f| f.to_string()).collect())
}

/// `rg := d.Get("resource_group_name")`, `name := d.Get("name")`,
/// `id := parse.NewFooID(subscriptionId, rg, name)`
fn foo_id_bindings() -> Vec<Stmt> {
    vec![
        define(
            "subscriptionId",
            selector(
                selector(ident("meta"), "Account"),
                "SubscriptionId",
            ),
        ),
        define("rg", d_get("resource_group_name")),
        define("name", d_get("name")),
        define(
            "id",
            call(
                pkg_sel("parse", "NewFooID"),
                vec![ident("subscriptionId"), ident("rg"), ident("name")],
            ),
        ),
    ]
}

#[test]
fn test_commit_through_id_method() {
    let mut stmts = foo_id_bindings();
    stmts.push(expr_stmt(method_call(
        "d",
        "SetId",
        vec![method_call("id", "ID", vec![])],
    )));
    assert_eq!(trace_resource(stmts), resolved(&["resource_group_name", "name"]));
}

#[test]
fn test_commit_through_variable() {
    let mut stmts = foo_id_bindings();
    stmts.push(expr_stmt(method_call("d", "SetId", vec![ident("id")])));
    assert_eq!(trace_resource(stmts), resolved(&["resource_group_name", "name"]));
}

#[test]
fn test_commit_of_inline_constructor() {
    let stmts = vec![
        define("name", d_get("name")),
        expr_stmt(method_call(
            "d",
            "SetId",
            vec![call(
                pkg_sel("parse", "NewFooID"),
                vec![
                    selector(ident("client"), "SubscriptionId"),
                    d_get("resource_group_name"),
                    ident("name"),
                ],
            )],
        )),
    ];
    assert_eq!(trace_resource(stmts), resolved(&["resource_group_name", "name"]));
}

#[test]
fn test_get_ok_binds_first_target() {
    let stmts = vec![
        define2("rg", "ok", method_call("d", "GetOk", vec![str_lit("resource_group_name")])),
        define(
            "id",
            call(pkg_sel("parse", "NewFooID"), vec![ident("tenantId"), ident("rg")]),
        ),
        expr_stmt(method_call("d", "SetId", vec![method_call("id", "String", vec![])])),
    ];
    assert_eq!(trace_resource(stmts), resolved(&["resource_group_name"]));
}

#[test]
fn test_typed_resource_inside_func_literal() {
    let mapping: ModelFieldMapping = [
        ("Name".to_string(), "name".to_string()),
        ("ResourceGroupName".to_string(), "resource_group_name".to_string()),
    ]
    .into_iter()
    .collect();

    let body = vec![
        Stmt::Var(VarDecl {
            names: vec!["model".to_string()],
            ty: Some(TypeExpr::named(None, "FooModel")),
            values: vec![],
            pos: Pos::default(),
        }),
        define(
            "id",
            call(
                pkg_sel("commonids", "NewFooID"),
                vec![
                    ident("subscriptionId"),
                    selector(ident("model"), "ResourceGroupName"),
                    selector(ident("model"), "Name"),
                ],
            ),
        ),
        expr_stmt(method_call("metadata", "SetID", vec![ident("id")])),
    ];
    let create = method(
        "FooResource",
        "Create",
        vec![ret(Expr::Composite {
            ty: Some(TypeExpr::named(Some("sdk"), "ResourceFunc")),
            elts: vec![kv("Func", func_lit(body))],
            pos: Pos::default(),
        })],
    );

    assert_eq!(
        trace(vec![create], DefinitionKind::Resource, &mapping),
        resolved(&["resource_group_name", "name"])
    );
}

#[test]
fn test_untagged_model_member_is_unresolvable() {
    let stmts = vec![
        define(
            "id",
            call(
                pkg_sel("parse", "NewFooID"),
                vec![ident("subscriptionId"), selector(ident("model"), "Name")],
            ),
        ),
        expr_stmt(method_call("metadata", "SetID", vec![ident("id")])),
    ];
    assert_eq!(trace_resource(stmts), Resolution::Unresolvable);
}

#[test]
fn test_parent_id_pattern() {
    let stmts = vec![
        define2(
            "parentId",
            "err",
            call(pkg_sel("parse", "ParseParentID"), vec![d_get("parent_id")]),
        ),
        define(
            "id",
            call(
                pkg_sel("parse", "NewChildID"),
                vec![
                    selector(ident("parentId"), "SubscriptionId"),
                    selector(ident("parentId"), "ResourceGroupName"),
                    selector(ident("parentId"), "ParentName"),
                    d_get("name"),
                ],
            ),
        ),
        expr_stmt(method_call("d", "SetId", vec![method_call("id", "ID", vec![])])),
    ];
    assert_eq!(trace_resource(stmts), resolved(&["parent_id", "name"]));
}

#[test]
fn test_parent_id_with_unresolved_source() {
    let stmts = vec![
        define2(
            "parentId",
            "err",
            call(
                pkg_sel("parse", "ParseParentID"),
                vec![selector(ident("resp"), "ID")],
            ),
        ),
        define(
            "id",
            call(
                pkg_sel("parse", "NewChildID"),
                vec![selector(ident("parentId"), "SubscriptionId"), d_get("name")],
            ),
        ),
        expr_stmt(method_call("d", "SetId", vec![method_call("id", "ID", vec![])])),
    ];
    assert_eq!(trace_resource(stmts), Resolution::Unresolvable);
}

#[test]
fn test_api_response_identifier_is_unresolvable() {
    let stmts = vec![
        define("name", d_get("name")),
        expr_stmt(method_call(
            "d",
            "SetId",
            vec![Expr::Star {
                x: Box::new(selector(ident("resp"), "ID")),
            }],
        )),
    ];
    assert_eq!(trace_resource(stmts), Resolution::Unresolvable);
}

#[test]
fn test_unresolved_argument_after_first_drops_commit() {
    let stmts = vec![
        define(
            "id",
            call(
                pkg_sel("parse", "NewFooID"),
                vec![ident("subscriptionId"), ident("somethingElse")],
            ),
        ),
        expr_stmt(method_call("d", "SetId", vec![ident("id")])),
    ];
    assert_eq!(trace_resource(stmts), Resolution::Unresolvable);
}

#[test]
fn test_commits_accumulate_without_duplicates() {
    let mut stmts = foo_id_bindings();
    stmts.push(expr_stmt(method_call("d", "SetId", vec![ident("id")])));
    stmts.push(expr_stmt(method_call("d", "SetId", vec![ident("unknown")])));
    stmts.push(define(
        "other",
        call(
            pkg_sel("parse", "NewBarID"),
            vec![ident("subscriptionId"), ident("name"), d_get("bar_name")],
        ),
    ));
    stmts.push(expr_stmt(method_call("d", "SetId", vec![ident("other")])));
    assert_eq!(
        trace_resource(stmts),
        resolved(&["resource_group_name", "name", "bar_name"])
    );
}

#[test]
fn test_other_receivers_do_not_commit() {
    let mut stmts = foo_id_bindings();
    stmts.push(expr_stmt(method_call("client", "SetId", vec![ident("id")])));
    assert_eq!(trace_resource(stmts), Resolution::NotApplicable);
}

#[test]
fn test_no_candidate_function() {
    let mut stmts = foo_id_bindings();
    stmts.push(expr_stmt(method_call("d", "SetId", vec![ident("id")])));
    let decls = vec![func("resourceFooUpdate", stmts)];
    assert_eq!(
        trace(decls, DefinitionKind::Resource, &ModelFieldMapping::default()),
        Resolution::NotApplicable
    );
}

#[test]
fn test_data_source_traces_read_functions() {
    let mut stmts = foo_id_bindings();
    stmts.push(expr_stmt(method_call("d", "SetId", vec![method_call("id", "ID", vec![])])));
    let decls = vec![
        func("dataSourceFooRead", stmts.clone()),
        func("resourceFooCreate", vec![]),
    ];
    assert_eq!(
        trace(decls.clone(), DefinitionKind::DataSource, &ModelFieldMapping::default()),
        resolved(&["resource_group_name", "name"])
    );
    // The same file read as a resource has no committing Create function
    assert_eq!(
        trace(decls, DefinitionKind::Resource, &ModelFieldMapping::default()),
        Resolution::NotApplicable
    );
}

#[test]
fn test_definition_kind_of_file() {
    let suffixes = Config::default().file_suffixes;
    assert_eq!(
        DefinitionKind::of_file("foo_resource.go", &suffixes),
        Some(DefinitionKind::Resource)
    );
    assert_eq!(
        DefinitionKind::of_file("foo_data_source.go", &suffixes),
        Some(DefinitionKind::DataSource)
    );
    assert_eq!(DefinitionKind::of_file("foo_helpers.go", &suffixes), None);
}
