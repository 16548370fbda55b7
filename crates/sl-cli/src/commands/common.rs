//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sl_core::{AllChanged, ChangeScope, Config, StaticChangeScope};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs exits without printing it
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the configuration named by `--config`, or `schemalint.yml` in `dir`,
/// and apply command-line overrides.
pub(crate) fn load_config(global: &GlobalArgs, all_files: bool, dir: &Path) -> Result<Config> {
    let mut config = Config::load_or_default(global.config.as_deref(), dir)
        .context("Failed to load configuration")?;
    if all_files {
        config.new_files_only = false;
    }
    Ok(config)
}

/// Change scope from `--changes`, or everything when no change list is given
pub(crate) fn load_scope(changes: Option<&Path>) -> Result<Arc<dyn ChangeScope>> {
    match changes {
        Some(path) => {
            let scope = StaticChangeScope::load(path)
                .with_context(|| format!("Failed to load change list {}", path.display()))?;
            Ok(Arc::new(scope))
        }
        None => Ok(Arc::new(AllChanged)),
    }
}

/// Split a comma-separated `--pass` value
pub(crate) fn parse_pass_filter(pass: Option<&str>) -> Option<Vec<String>> {
    pass.map(|p| {
        p.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
