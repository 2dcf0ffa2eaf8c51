//! Rewind CLI - versioned migrations and seeds for DuckDB

use anyhow::Result;
use clap::Parser;
use rw_core::ScriptKind;

mod cli;
mod commands;

use cli::{Cli, Commands, MigrationCommands, SeedCommands};
use commands::{create, init, run, status, undo};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        Commands::Init(args) => init::execute(args, &cli.global),
        Commands::Migration(command) => {
            let kind = ScriptKind::Migration;
            match command {
                MigrationCommands::Create(args) => create::execute(args, kind, &cli.global),
                MigrationCommands::Run(args) => run::execute(args, kind, &cli.global),
                MigrationCommands::Undo(args) => undo::execute(args, kind, &cli.global),
                MigrationCommands::Status(args) => status::execute(args, kind, &cli.global),
            }
        }
        Commands::Seed(command) => {
            let kind = ScriptKind::Seed;
            match command {
                SeedCommands::Generate(args) => create::execute(args, kind, &cli.global),
                SeedCommands::Run(args) => run::execute(args, kind, &cli.global),
                SeedCommands::Undo(args) => undo::execute(args, kind, &cli.global),
                SeedCommands::Status(args) => status::execute(args, kind, &cli.global),
            }
        }
    }
}

/// Diagnostics go to stderr: warnings by default, debug with --verbose,
/// RUST_LOG overrides both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
