mod cli;
mod commands;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

/// Exit status for a query the policy denies.
const EXIT_DENIED: i32 = 2;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DENIED),
        Err(e) => {
            print_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}

/// Returns `false` when a `check` query was denied.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    match &cli.command {
        Commands::Validate(args) => {
            commands::validate::validate(args)?;
            Ok(true)
        }
        Commands::Check(args) => commands::check::check(args),
    }
}
