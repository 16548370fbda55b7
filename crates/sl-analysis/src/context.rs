//! Analysis context: shared state available to all passes

use crate::schema::SharedSchemaCache;
use sl_core::{AllChanged, ChangeScope, Config};
use std::sync::Arc;

/// Context object passed to analysis passes.
///
/// One context is shared by every module analyzed in a run, so the shared
/// schema cache is populated at most once per run.
pub struct AnalysisContext {
    /// Analyzer configuration
    pub(crate) config: Config,
    /// Helpers exported by the shared schema module
    pub(crate) cache: Arc<SharedSchemaCache>,
    /// Decides which findings are surfaced
    pub(crate) scope: Arc<dyn ChangeScope>,
}

impl AnalysisContext {
    /// Create a new analysis context
    pub fn new(config: Config, cache: Arc<SharedSchemaCache>, scope: Arc<dyn ChangeScope>) -> Self {
        Self {
            config,
            cache,
            scope,
        }
    }

    /// Context with a fresh cache built from `config`, reporting every change
    pub fn with_config(config: Config) -> Self {
        let cache = Arc::new(SharedSchemaCache::new(config.shared_schema.clone()));
        Self::new(config, cache, Arc::new(AllChanged))
    }

    /// Access the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the shared schema cache
    pub fn cache(&self) -> &SharedSchemaCache {
        &self.cache
    }

    /// Access the change scope
    pub fn scope(&self) -> &dyn ChangeScope {
        self.scope.as_ref()
    }
}
