//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod entity_cmd;
pub mod filters;
pub mod helpers;
pub mod output;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
pub use entity_cmd::EntityConfig;
pub use filters::{QualityFilter, StatusFilter};

use miette::Result;

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Engine(cmd) => commands::engine::run(cmd, &global),
        Commands::Vehicle(cmd) => commands::vehicle::run(cmd, &global),
        Commands::Trans(cmd) => commands::trans::run(cmd, &global),
        Commands::Build(cmd) => commands::build::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
