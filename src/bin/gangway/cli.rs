//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Global flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct GlobalFlags {
    pub verbose: bool,
    pub quiet: bool,
    pub no_color: bool,
}

/// Gangway - a universal C/C++ dependency bootstrapper fronting a zig
/// cross-compiling backend
#[derive(Parser)]
#[command(name = "gangway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve and install a package plus its dependency metadata
    Install(InstallArgs),

    /// Compile a single C/C++ source file and run it
    Run(RunArgs),

    /// Show the compile/link flags resolved from installed dependencies
    Flags(FlagsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Internal resource-compiler shim entry point
    #[command(name = "rc-shim", hide = true)]
    RcShim(RcShimArgs),
}

#[derive(Args)]
pub struct InstallArgs {
    /// Package reference (e.g. zlib/1.3.1)
    pub package: String,
}

#[derive(Args)]
pub struct RunArgs {
    /// Source file to compile and execute
    pub source: PathBuf,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Parse strictly: unresolved metadata variables become errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[derive(Args)]
pub struct RcShimArgs {
    /// Backend executable path
    pub backend: String,

    /// Original windres-style arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
