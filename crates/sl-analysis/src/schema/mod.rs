//! Schema maps: extraction and descriptor resolution

pub(crate) mod cache;
pub(crate) mod descriptor;
pub(crate) mod extractor;
pub(crate) mod resolver;

use crate::resolution::Resolution;
use extractor::extract_schema_maps;
use resolver::DescriptorResolver;
use sl_core::facts::FactsProvider;
use sl_core::syntax::{Pos, SourceFile};
use std::path::PathBuf;

pub use cache::{CacheState, JsonModuleLoader, ModuleLoader, SharedSchemaCache, SharedSchemas};
pub use descriptor::{FieldDescriptor, SchemaFlags};

/// One field of a schema map, resolved or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub position: Pos,
    pub descriptor: Resolution<FieldDescriptor>,
}

/// A schema map literal with its entries in declaration order
#[derive(Debug, Clone)]
pub struct SchemaMap {
    pub file: PathBuf,
    pub pos: Pos,
    /// Element schema of a list or set (found under `Elem`)
    pub nested: bool,
    pub entries: Vec<SchemaEntry>,
}

impl SchemaMap {
    /// Field names in declaration order
    pub fn actual_order(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Descriptors of every entry, or `Unresolvable` if any entry is unresolved
    pub fn resolved_fields(&self) -> Resolution<Vec<&FieldDescriptor>> {
        self.entries
            .iter()
            .map(|e| e.descriptor.as_resolved())
            .collect::<Option<Vec<_>>>()
            .into()
    }

    /// Names of entries whose descriptor could not be resolved
    pub fn unresolved_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.descriptor.is_resolved())
            .map(|e| e.name.as_str())
            .collect()
    }
}

/// Extract every schema map of `file` and resolve its field descriptors
pub fn collect_schema_maps(
    file: &SourceFile,
    facts: &dyn FactsProvider,
    schema_modules: &[String],
    cache: &SharedSchemaCache,
) -> Vec<SchemaMap> {
    let resolver = DescriptorResolver::new(facts, file, cache);
    extract_schema_maps(file, facts, schema_modules)
        .into_iter()
        .map(|raw| SchemaMap {
            file: file.path.clone(),
            pos: raw.pos,
            nested: raw.nested,
            entries: raw
                .entries
                .into_iter()
                .map(|entry| SchemaEntry {
                    descriptor: if entry.constant_key {
                        resolver.resolve(&entry.name, entry.value, entry.position)
                    } else {
                        Resolution::Unresolvable
                    },
                    name: entry.name,
                    position: entry.position,
                })
                .collect(),
        })
        .collect()
}
