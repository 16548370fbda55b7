//! `schemalint check` command: run analysis passes on exported module facts

use anyhow::{Context, Result};
use sl_analysis::{AnalysisContext, Diagnostic, PassManager, SharedSchemaCache};
use sl_core::ModuleFacts;
use std::sync::Arc;

use crate::cli::{CheckArgs, CheckOutput, GlobalArgs};
use crate::commands::common::{load_config, load_scope, parse_pass_filter, ExitCode};

/// Execute the check command
pub fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = load_config(global, args.all_files, &cwd)?;

    let manager = PassManager::with_defaults();
    let pass_filter = parse_pass_filter(args.pass.as_deref());
    if let Some(filter) = &pass_filter {
        manager.check_filter(filter)?;
    }

    let facts = args
        .facts
        .iter()
        .map(|path| {
            ModuleFacts::load(path)
                .with_context(|| format!("Failed to load facts {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    if global.verbose {
        eprintln!("[verbose] Loaded facts for {} module(s)", facts.len());
    }

    let scope = load_scope(args.changes.as_deref())?;
    let cache = Arc::new(SharedSchemaCache::new(config.shared_schema.clone()));
    let ctx = AnalysisContext::new(config, Arc::clone(&cache), scope);

    let diagnostics = manager.run(&facts, &ctx, pass_filter.as_deref());
    if global.verbose {
        eprintln!(
            "[verbose] Shared schema cache: {} population pass(es)",
            cache.population_passes()
        );
    }

    match args.output {
        CheckOutput::Json => print_json(&diagnostics)?,
        CheckOutput::Table => print_table(&diagnostics),
    }

    if !diagnostics.is_empty() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Print diagnostics as a table
fn print_table(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        println!("No findings.");
        return;
    }

    let locations: Vec<String> = diagnostics
        .iter()
        .map(|d| format!("{}:{}:{}", d.file.display(), d.line, d.column))
        .collect();
    let loc_w = locations.iter().map(String::len).max().unwrap_or(8).max(8);
    let sev_w = 8;
    let code_w = 5;

    println!(
        "{:<loc_w$}  {:<sev_w$}  {:<code_w$}  MESSAGE",
        "LOCATION", "SEVERITY", "CODE",
    );
    for (d, location) in diagnostics.iter().zip(&locations) {
        println!(
            "{:<loc_w$}  {:<sev_w$}  {:<code_w$}  {}",
            location,
            d.severity.to_string(),
            d.code.to_string(),
            d.message,
        );
        if let Some(hint) = &d.hint {
            println!("{:<loc_w$}  {}", "", hint);
        }
    }

    println!("\n{} finding(s)", diagnostics.len());
}

/// Print diagnostics as JSON
fn print_json(diagnostics: &[Diagnostic]) -> Result<()> {
    let json = serde_json::to_string_pretty(diagnostics)?;
    println!("{}", json);
    Ok(())
}
