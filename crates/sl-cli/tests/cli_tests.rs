//! Integration tests for the schemalint binary

use sl_analysis::test_utils::{
    call, d_get, define, expr_stmt, func, ident, method_call, module, pkg_sel, ret, schema_lit,
    schema_map, source_file,
};
use sl_core::FactsExport;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Path to the compiled schemalint binary
fn schemalint_bin() -> String {
    env!("CARGO_BIN_EXE_schemalint").to_string()
}

/// Run schemalint in `dir` and return (stdout, stderr, exit code)
fn run_schemalint(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(schemalint_bin())
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute schemalint with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write a facts export for one resource file whose schema has `fields`
/// (name, flags) in declaration order
fn write_resource_facts(dir: &Path, fields: &[(&str, &[&str])]) -> PathBuf {
    let service_dir = dir.join("internal/services/foo");
    let create = func(
        "resourceFooCreate",
        vec![
            define(
                "id",
                call(
                    pkg_sel("parse", "NewFooID"),
                    vec![
                        ident("subscriptionId"),
                        d_get("resource_group_name"),
                        d_get("name"),
                    ],
                ),
            ),
            expr_stmt(method_call("d", "SetId", vec![method_call("id", "ID", vec![])])),
        ],
    );
    let entries = fields
        .iter()
        .map(|(name, flags)| (*name, schema_lit(flags)))
        .collect();
    let file = source_file(
        service_dir.join("foo_resource.go").to_str().unwrap(),
        vec![func("resourceFoo", vec![ret(schema_map(entries))]), create],
    );
    let export = FactsExport {
        module: module(
            "example.com/provider/internal/services/foo",
            service_dir.to_str().unwrap(),
            vec![file],
        ),
        types: vec![],
        callees: vec![],
        imported_types: vec![],
    };
    let path = dir.join("foo.facts.json");
    std::fs::write(&path, serde_json::to_string(&export).unwrap()).unwrap();
    path
}

const UNORDERED: &[(&str, &[&str])] = &[
    ("location", &["required", "force_new"]),
    ("name", &["required", "force_new"]),
    ("resource_group_name", &["required", "force_new"]),
    ("tags", &["optional"]),
];

const ORDERED: &[(&str, &[&str])] = &[
    ("name", &["required", "force_new"]),
    ("resource_group_name", &["required", "force_new"]),
    ("location", &["required", "force_new"]),
    ("tags", &["optional"]),
];

#[test]
fn test_passes_lists_schema_order() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_schemalint(dir.path(), &["passes"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("schema_order"), "stdout: {stdout}");
}

#[test]
fn test_check_reports_unordered_schema() {
    let dir = tempfile::tempdir().unwrap();
    let facts = write_resource_facts(dir.path(), UNORDERED);

    let (stdout, _, code) = run_schemalint(dir.path(), &["check", facts.to_str().unwrap()]);
    assert_eq!(code, 1, "stdout: {stdout}");
    assert!(stdout.contains("SL001"));
    assert!(stdout.contains("foo_resource.go:10:9"));
    assert!(stdout.contains("1 finding(s)"));
}

#[test]
fn test_check_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let facts = write_resource_facts(dir.path(), UNORDERED);

    let (stdout, _, code) = run_schemalint(
        dir.path(),
        &["check", "--output", "json", facts.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    let diagnostics: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"], "SL001");
    assert_eq!(
        diagnostics[0]["expected_order"],
        serde_json::json!(["name", "resource_group_name", "location", "tags"])
    );
}

#[test]
fn test_check_clean_schema_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let facts = write_resource_facts(dir.path(), ORDERED);

    let (stdout, _, code) = run_schemalint(dir.path(), &["check", facts.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No findings."));
}

#[test]
fn test_change_list_limits_reporting() {
    let dir = tempfile::tempdir().unwrap();
    let facts = write_resource_facts(dir.path(), UNORDERED);
    let changes = dir.path().join("changes.yml");
    std::fs::write(
        &changes,
        "internal/services/foo/foo_resource.go:\n  lines: [{start: 8, end: 12}]\n",
    )
    .unwrap();
    let facts = facts.to_str().unwrap();
    let changes = changes.to_str().unwrap();

    // Modified (not new) file: skipped unless --all-files
    let (_, _, code) = run_schemalint(dir.path(), &["check", "--changes", changes, facts]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_schemalint(
        dir.path(),
        &["check", "--changes", changes, "--all-files", facts],
    );
    assert_eq!(code, 1, "stdout: {stdout}");
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let facts = write_resource_facts(dir.path(), UNORDERED);
    std::fs::write(
        dir.path().join("schemalint.yml"),
        "skip_packages: [\"/services/foo\"]\n",
    )
    .unwrap();

    let (_, _, code) = run_schemalint(dir.path(), &["check", facts.to_str().unwrap()]);
    assert_eq!(code, 0);
}

#[test]
fn test_missing_facts_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_schemalint(dir.path(), &["check", "missing.json"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("[E004]"), "stderr: {stderr}");
}

#[test]
fn test_unknown_pass_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let facts = write_resource_facts(dir.path(), ORDERED);
    let (_, stderr, code) = run_schemalint(
        dir.path(),
        &["check", "--pass", "no_such_pass", facts.to_str().unwrap()],
    );
    assert_eq!(code, 2);
    assert!(stderr.contains("[AE002]"), "stderr: {stderr}");
}
