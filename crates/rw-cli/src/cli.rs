//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Rewind - versioned migrations and seeds for DuckDB
#[derive(Parser, Debug)]
#[command(name = "rw")]
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

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Environment from rewind.yml to use (falls back to REWIND_ENV)
    #[arg(short, long, global = true)]
    pub env: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a project: rewind.yml and script directories
    Init(InitArgs),

    /// Create, run, undo and inspect schema migrations
    #[command(subcommand)]
    Migration(MigrationCommands),

    /// Generate, run, undo and inspect data seeds
    #[command(subcommand)]
    Seed(SeedCommands),
}

/// Migration subcommands
#[derive(Subcommand, Debug)]
pub enum MigrationCommands {
    /// Create a new migration file
    Create(CreateArgs),

    /// Run all pending migrations
    Run(RunArgs),

    /// Undo the last migration (or all with --all)
    Undo(UndoArgs),

    /// Show executed and pending migrations
    Status(StatusArgs),
}

/// Seed subcommands
#[derive(Subcommand, Debug)]
pub enum SeedCommands {
    /// Generate a new seed file
    Generate(CreateArgs),

    /// Run all pending seeds
    Run(RunArgs),

    /// Undo the last seed (or all with --all)
    Undo(UndoArgs),

    /// Show executed and pending seeds
    Status(StatusArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,

    /// Project name written to rewind.yml (default: directory name)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for migration create / seed generate
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the script, e.g. create-users-table
    #[arg(short, long)]
    pub name: String,
}

/// Arguments for the run commands
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run each script and its ledger update in one transaction
    #[arg(long)]
    pub transactional: bool,
}

/// Arguments for the undo commands
#[derive(Args, Debug)]
pub struct UndoArgs {
    /// Undo every executed script, newest first
    #[arg(short, long)]
    pub all: bool,

    /// Run each script and its ledger update in one transaction
    #[arg(long)]
    pub transactional: bool,
}

/// Arguments for the status commands
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable list
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
