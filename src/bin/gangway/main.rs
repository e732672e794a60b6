//! Gangway CLI - a universal C/C++ dependency bootstrapper

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gangway=debug")
    } else {
        EnvFilter::new("gangway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let globals = cli::GlobalFlags {
        verbose: cli.verbose,
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Install(args) => commands::install::execute(globals, args),
        Commands::Run(args) => commands::run::execute(globals, args),
        Commands::Flags(args) => commands::flags::execute(globals, args),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::RcShim(args) => commands::rc_shim::execute(args),
    }
}
