//! `swapspec init` command - create a project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::identity::EntityPrefix;
use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> Result<()> {
    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir().into_diagnostic()?,
    };
    std::fs::create_dir_all(&root).into_diagnostic()?;

    match Project::init(&root) {
        Ok(project) => {
            println!(
                "{} Initialized SwapSpec project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            for prefix in EntityPrefix::all() {
                println!("   {}/", style(prefix.directory()).dim());
            }
            println!();
            println!(
                "Add reference specs to {} to enable enrichment.",
                style(".swapspec/catalog.yaml").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Project already exists at {}",
                style("!").yellow(),
                path.display()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
