//! Process-wide cache of `Schema` helpers exported by the shared module.
//!
//! Resource definitions often build fields through a shared helper module
//! (`commonschema.ResourceGroupName()`, `commonschema.Location()`, ...). The
//! first analysis that needs one of those helpers loads the whole module once;
//! every later lookup, from any thread, reads the same immutable map.

use super::descriptor::SchemaFlags;
use super::resolver::returned_schema_flags;
use crate::error::{AnalysisError, AnalysisResult};
use sl_core::config::SharedSchemaConfig;
use sl_core::facts::ModuleFacts;
use sl_core::syntax::Module;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Helper flags keyed by qualified function name (`module/path.Func`)
pub type SharedSchemas = Arc<HashMap<String, SchemaFlags>>;

/// Directory fragments of toolchain build caches; never used for discovery
const BUILD_CACHE_MARKERS: &[&str] = &["go-build", "AppData", ".test"];

/// Loads the syntax of the shared helper module from its directory
pub trait ModuleLoader: Send + Sync {
    fn load(&self, dir: &Path) -> AnalysisResult<Module>;
}

/// Reads a JSON facts export stored inside the helper module directory
#[derive(Debug, Clone)]
pub struct JsonModuleLoader {
    facts_file: String,
}

impl JsonModuleLoader {
    pub fn new(facts_file: impl Into<String>) -> Self {
        Self {
            facts_file: facts_file.into(),
        }
    }
}

impl ModuleLoader for JsonModuleLoader {
    fn load(&self, dir: &Path) -> AnalysisResult<Module> {
        let path = dir.join(&self.facts_file);
        let facts = ModuleFacts::load(&path).map_err(|e| AnalysisError::SharedModuleLoad {
            dir: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(facts.into_module())
    }
}

/// Lifecycle of the cache contents
#[derive(Debug, Clone)]
pub enum CacheState {
    Empty,
    Loading,
    Populated(SharedSchemas),
    /// The last load found nothing; the next caller tries again
    FailedRetryable,
}

/// Lazily populated, thread-safe helper cache.
///
/// A load that yields at least one helper is kept for the lifetime of the
/// cache. A load that yields nothing (module not found, unreadable, or without
/// exported helpers) is handed to its caller but not kept, so a later caller
/// analyzing a module from another directory can retry discovery.
pub struct SharedSchemaCache {
    config: SharedSchemaConfig,
    loader: Box<dyn ModuleLoader>,
    state: RwLock<CacheState>,
    population_passes: AtomicUsize,
}

impl SharedSchemaCache {
    /// Cache that reads the helper module through a [`JsonModuleLoader`]
    pub fn new(config: SharedSchemaConfig) -> Self {
        let loader = JsonModuleLoader::new(config.facts_file.clone());
        Self::with_loader(config, Box::new(loader))
    }

    pub fn with_loader(config: SharedSchemaConfig, loader: Box<dyn ModuleLoader>) -> Self {
        Self {
            config,
            loader,
            state: RwLock::new(CacheState::Empty),
            population_passes: AtomicUsize::new(0),
        }
    }

    /// The cached helpers, loading them on first use.
    ///
    /// `module` is the module under analysis; discovery starts from its
    /// source directory.
    pub fn get_or_load(&self, module: &Module) -> SharedSchemas {
        if !self.config.enabled {
            return SharedSchemas::default();
        }

        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let CacheState::Populated(schemas) = &*state {
                return Arc::clone(schemas);
            }
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have populated the cache while this one waited
        if let CacheState::Populated(schemas) = &*state {
            return Arc::clone(schemas);
        }

        *state = CacheState::Loading;
        let schemas = Arc::new(self.populate(module.source_dir()));
        self.population_passes.fetch_add(1, Ordering::SeqCst);

        if schemas.is_empty() {
            log::debug!("shared schema cache: nothing loaded, will retry");
            *state = CacheState::FailedRetryable;
        } else {
            log::debug!("shared schema cache: loaded {} helpers", schemas.len());
            *state = CacheState::Populated(Arc::clone(&schemas));
        }
        schemas
    }

    /// Number of load attempts made so far
    pub fn population_passes(&self) -> usize {
        self.population_passes.load(Ordering::SeqCst)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CacheState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn populate(&self, start: &Path) -> HashMap<String, SchemaFlags> {
        let Some(dir) = discover_helper_dir(start, &self.config) else {
            log::debug!(
                "shared schema cache: no helper module found from {}",
                start.display()
            );
            return HashMap::new();
        };
        if !dir.is_dir() {
            log::debug!("shared schema cache: {} does not exist", dir.display());
            return HashMap::new();
        }

        match self.loader.load(&dir) {
            Ok(helper) => collect_helpers(&helper),
            Err(e) => {
                log::warn!("{e}");
                HashMap::new()
            }
        }
    }
}

/// Helper module directory for analyzed code under `start`.
///
/// Ascends to the nearest `sentinel_dir` component, steps one level above it
/// and joins `relative_path`.
pub fn discover_helper_dir(start: &Path, config: &SharedSchemaConfig) -> Option<PathBuf> {
    let text = start.to_string_lossy();
    if BUILD_CACHE_MARKERS.iter().any(|m| text.contains(m)) {
        return None;
    }
    let sentinel = start
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|n| n == config.sentinel_dir.as_str()))?;
    let root = sentinel.parent()?;
    Some(root.join(&config.relative_path))
}

fn collect_helpers(helper: &Module) -> HashMap<String, SchemaFlags> {
    helper
        .files
        .iter()
        .flat_map(|file| file.funcs())
        .filter(|func| func.receiver.is_none() && func.is_exported())
        .filter_map(|func| {
            returned_schema_flags(func).map(|flags| (helper.path.qualify(&func.name), flags))
        })
        .collect()
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
