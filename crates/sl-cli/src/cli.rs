//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// schemalint - checks that provider schema fields follow the canonical order
#[derive(Parser, Debug)]
#[command(name = "schemalint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override config file path (default: ./schemalint.yml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check exported module facts for schema convention violations
    Check(CheckArgs),

    /// List available analysis passes
    Passes,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Module facts exports (JSON) to analyze
    #[arg(required = true)]
    pub facts: Vec<PathBuf>,

    /// Change list (YAML or JSON) limiting which findings are reported
    #[arg(long)]
    pub changes: Option<PathBuf>,

    /// Report findings in modified files too, not only in new ones
    #[arg(long)]
    pub all_files: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: CheckOutput,

    /// Passes to run (comma-separated, default: all)
    #[arg(long)]
    pub pass: Option<String>,
}

/// Check output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
