//! Rope CLI - inspect recipe resolution of a PHP project

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use rope::util::diagnostic::{emit, Diagnostic};

fn main() {
    if let Err(e) = run() {
        emit(&Diagnostic::from_error(&e), std::io::stderr().is_terminal());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("rope=debug")
    } else {
        EnvFilter::new("rope=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Recipes(args) => commands::recipes::execute(args),
        Commands::Sources(args) => commands::sources::execute(args),
        Commands::Origin(args) => commands::origin::execute(args),
    }
}
