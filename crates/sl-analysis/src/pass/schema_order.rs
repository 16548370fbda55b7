//! SchemaOrder pass: checks the declaration order of schema fields (SL001)

use crate::context::AnalysisContext;
use crate::order::expected_order;
use crate::pass::{AnalysisPass, Diagnostic, DiagnosticCode, Severity};
use crate::resolution::Resolution;
use crate::schema::{collect_schema_maps, FieldDescriptor, SchemaMap};
use crate::trace::{DefinitionKind, IdProvenanceTracer, ModelFieldMapping};
use serde::Serialize;
use sl_core::syntax::Pos;
use sl_core::FactsProvider;
use std::path::PathBuf;

const PASS_NAME: &str = "schema_order";

/// A schema map whose declared order differs from the canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: PathBuf,
    pub pos: Pos,
    pub nested: bool,
    pub expected_order: Vec<String>,
    pub actual_order: Vec<String>,
}

impl Finding {
    pub fn into_diagnostic(self, module: &str) -> Diagnostic {
        Diagnostic {
            code: DiagnosticCode::SL001,
            severity: Severity::Warning,
            message: if self.nested {
                "nested schema fields are not in the expected order".to_string()
            } else {
                "schema fields are not in the expected order".to_string()
            },
            module: module.to_string(),
            file: self.file,
            line: self.pos.line,
            column: self.pos.column,
            hint: Some(format!("expected order: {}", self.expected_order.join(", "))),
            pass_name: PASS_NAME.to_string(),
            expected_order: self.expected_order,
            actual_order: self.actual_order,
        }
    }
}

/// Compare one schema map against its canonical order.
///
/// Maps with an unresolved field, maps matching an alternate-identifier
/// exemption, and maps already in order produce nothing.
pub fn check_schema_map(map: &SchemaMap, ids: &Resolution<Vec<String>>) -> Option<Finding> {
    let Resolution::Resolved(fields) = map.resolved_fields() else {
        log::debug!(
            "{}:{}: skipping schema map with unresolved fields: {}",
            map.file.display(),
            map.pos.line,
            map.unresolved_names().join(", ")
        );
        return None;
    };

    if !map.nested {
        if let Some(reason) = exemption(&fields) {
            log::debug!(
                "{}:{}: schema map exempt ({reason})",
                map.file.display(),
                map.pos.line
            );
            return None;
        }
    }

    let actual = map.actual_order();
    let expected = expected_order(&fields, ids, map.nested);
    if expected.len() != actual.len() || expected == actual {
        return None;
    }
    Some(Finding {
        file: map.file.clone(),
        pos: map.pos,
        nested: map.nested,
        expected_order: expected,
        actual_order: actual,
    })
}

/// Alternate-identifier patterns that make the canonical order meaningless
fn exemption(fields: &[&FieldDescriptor]) -> Option<&'static str> {
    for field in fields {
        let flags = &field.flags;
        if field.name == "name" && flags.optional && !flags.exactly_one_of.is_empty() {
            return Some("optional name with ExactlyOneOf");
        }
        let identifier_like = field.name.ends_with("_id") || field.name.ends_with("_name");
        if identifier_like && flags.optional && flags.computed && flags.force_new {
            return Some("optional computed identifier field");
        }
    }
    None
}

/// Schema field ordering pass
pub(crate) struct SchemaOrderPass;

impl AnalysisPass for SchemaOrderPass {
    fn name(&self) -> &'static str {
        PASS_NAME
    }

    fn description(&self) -> &'static str {
        "Checks that schema fields follow the canonical order (identifier, location, required, optional, computed, tags)"
    }

    fn run_module(&self, facts: &dyn FactsProvider, ctx: &AnalysisContext) -> Vec<Diagnostic> {
        let module = facts.module();
        let config = ctx.config();
        if config.is_skipped_package(module.path.as_str()) {
            log::debug!("skipping module {}", module.path);
            return Vec::new();
        }

        let scope = ctx.scope();
        let mut diagnostics = Vec::new();
        for file in &module.files {
            let file_name = file.file_name();
            if config.is_skipped_file(file_name) {
                continue;
            }
            let Some(kind) = DefinitionKind::of_file(file_name, &config.file_suffixes) else {
                continue;
            };
            if !scope.is_file_changed(&file.path)
                || (config.new_files_only && !scope.is_new_file(&file.path))
            {
                continue;
            }

            let mapping = ModelFieldMapping::for_file(file, facts);
            let ids = IdProvenanceTracer::new(&mapping, config).trace_file(file, kind);
            if ids == Resolution::Unresolvable {
                log::debug!(
                    "{}: identifier fields not resolvable, identifier order not checked",
                    file.path.display()
                );
            }

            for map in collect_schema_maps(file, facts, &config.schema_modules, ctx.cache()) {
                let Some(finding) = check_schema_map(&map, &ids) else {
                    continue;
                };
                if scope.should_report(&finding.file, finding.pos.line) {
                    diagnostics.push(finding.into_diagnostic(module.path.as_str()));
                }
            }
        }
        diagnostics
    }
}

#[cfg(test)]
#[path = "schema_order_test.rs"]
mod tests;
