//! schemalint CLI - checks provider schema definitions for ordering conventions

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{check, passes};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Check(args) => check::execute(args, &cli.global),
        cli::Commands::Passes => passes::execute(),
    };

    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(2);
    }
}
