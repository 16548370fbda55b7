//! sl-analysis: schema convention analysis for provider definitions
//!
//! This crate extracts schema maps from module facts, resolves each field's
//! descriptor (inline, through a same-module helper, or through the shared
//! helper module cache), traces which fields compose a resource identifier,
//! and reports maps whose declared order differs from the canonical one.

pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod order;
pub(crate) mod pass;
pub(crate) mod resolution;
pub(crate) mod schema;
pub(crate) mod trace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use context::AnalysisContext;
pub use error::{AnalysisError, AnalysisResult};
pub use order::expected_order;
pub use pass::schema_order::{check_schema_map, Finding};
pub use pass::{AnalysisPass, Diagnostic, DiagnosticCode, PassManager, Severity};
pub use resolution::Resolution;
pub use schema::cache::discover_helper_dir;
pub use schema::{
    collect_schema_maps, CacheState, FieldDescriptor, JsonModuleLoader, ModuleLoader,
    SchemaEntry, SchemaFlags, SchemaMap, SharedSchemaCache, SharedSchemas,
};
pub use trace::{parse_tfschema_tag, DefinitionKind, IdProvenanceTracer, ModelFieldMapping};
