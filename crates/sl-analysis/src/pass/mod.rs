//! Pass infrastructure: composable analysis passes over module facts

pub(crate) mod schema_order;

use crate::context::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use sl_core::FactsProvider;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Convention violation worth fixing
    Warning,
    /// The definition is wrong
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Diagnostic codes emitted by the built-in passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Schema fields are not in canonical order
    SL001,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::SL001 => write!(f, "SL001"),
        }
    }
}

/// A diagnostic message produced by an analysis pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic code
    pub code: DiagnosticCode,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Import path of the module the finding belongs to
    pub module: String,
    /// Source file
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    /// Optional hint for how to fix
    pub hint: Option<String>,
    /// Name of the pass that produced this diagnostic
    pub pass_name: String,
    /// Field order the convention expects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_order: Vec<String>,
    /// Field order as declared
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actual_order: Vec<String>,
}

/// Per-module analysis pass trait
pub trait AnalysisPass: Send + Sync {
    /// Pass name (used for filtering and display)
    fn name(&self) -> &'static str;
    /// Human-readable description
    fn description(&self) -> &'static str;
    /// Run the pass on a single module
    fn run_module(&self, facts: &dyn FactsProvider, ctx: &AnalysisContext) -> Vec<Diagnostic>;
}

/// Manages and runs analysis passes
pub struct PassManager {
    passes: Vec<Box<dyn AnalysisPass>>,
}

impl PassManager {
    /// Create a PassManager with all built-in passes registered
    pub fn with_defaults() -> Self {
        Self {
            passes: vec![Box::new(schema_order::SchemaOrderPass)],
        }
    }

    /// Reject filter entries that name no registered pass
    pub fn check_filter(&self, pass_filter: &[String]) -> AnalysisResult<()> {
        let names = self.pass_names();
        match pass_filter
            .iter()
            .find(|f| !names.iter().any(|n| n == f))
        {
            Some(unknown) => Err(AnalysisError::UnknownPass {
                name: unknown.clone(),
                available: names.join(", "),
            }),
            None => Ok(()),
        }
    }

    /// Run the selected passes on one module
    pub fn run_module(
        &self,
        facts: &dyn FactsProvider,
        ctx: &AnalysisContext,
        pass_filter: Option<&[String]>,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for pass in &self.passes {
            if let Some(filter) = pass_filter {
                if !filter.iter().any(|f| f == pass.name()) {
                    continue;
                }
            }
            diagnostics.extend(pass.run_module(facts, ctx));
        }
        diagnostics
    }

    /// Run the selected passes on every module.
    ///
    /// Modules are split into contiguous chunks, one worker thread per chunk,
    /// with at most [`worker_count`] workers. All workers share `ctx` and with
    /// it the shared schema cache. The result is ordered by file and position
    /// regardless of scheduling.
    pub fn run<F: FactsProvider>(
        &self,
        modules: &[F],
        ctx: &AnalysisContext,
        pass_filter: Option<&[String]>,
    ) -> Vec<Diagnostic> {
        if modules.is_empty() {
            return Vec::new();
        }
        let chunk_size = modules.len().div_ceil(worker_count(modules.len()));
        let mut diagnostics: Vec<Diagnostic> = std::thread::scope(|scope| {
            let handles: Vec<_> = modules
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .flat_map(|facts| self.run_module(facts, ctx, pass_filter))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });
        diagnostics.sort_by(|a, b| {
            (&a.file, a.line, a.column, a.code as u8).cmp(&(&b.file, b.line, b.column, b.code as u8))
        });
        diagnostics
    }

    /// List all available pass names
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Pass names with their descriptions
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.passes
            .iter()
            .map(|p| (p.name(), p.description()))
            .collect()
    }
}

/// Number of worker threads for `modules` modules: the available
/// parallelism, never more than one per module
pub fn worker_count(modules: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    available.min(modules).max(1)
}
