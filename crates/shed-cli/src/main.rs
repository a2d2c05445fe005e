//! Tool shed CLI
//!
//! Sets and inspects repository metadata from the command line.

mod cli;
mod commands;
mod context;
mod error;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

const DEFAULT_FILTER: &str = "shed=info";
const VERBOSE_FILTER: &str = "shed=debug";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: Cli) -> Result<ExitCode> {
    let context = Context::load(&cli.config)?;

    match cli.command {
        Commands::SetMetadata {
            target,
            revision,
            json,
        } => commands::run_set_metadata(&context, &target, revision.as_deref(), json),
        Commands::Show {
            target,
            revision,
            json,
        } => commands::run_show(&context, &target, revision.as_deref(), json),
        Commands::Revisions { target, json } => commands::run_revisions(&context, &target, json),
        Commands::Encode { value, json } => commands::run_encode(&context, &value, json),
        Commands::Decode { value } => commands::run_decode(&context, &value),
    }
}
