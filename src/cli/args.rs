//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::build::BuildCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::engine::EngineCommands;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::trans::TransCommands;
use crate::cli::commands::vehicle::VehicleCommands;

#[derive(Parser, Debug)]
#[command(
    name = "swapspec",
    version,
    about = "SwapSpec - engine swap planning with provenance-tracked specs and fitment checks",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "auto")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty output for single records, TSV for lists
    Auto,
    Yaml,
    Json,
    Tsv,
    /// IDs only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new SwapSpec project
    Init(InitArgs),

    /// Manage engine spec records
    #[command(subcommand)]
    Engine(EngineCommands),

    /// Manage vehicle spec records
    #[command(subcommand)]
    Vehicle(VehicleCommands),

    /// Manage transmission spec records
    #[command(subcommand)]
    Trans(TransCommands),

    /// Plan swap builds and check fitment
    #[command(subcommand)]
    Build(BuildCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}
