//! `swapspec build` command - Swap builds, fitment checks and exports

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::entity_cmd::{open_project, output_format, output_new_entity, print_list, EntityConfig};
use crate::cli::filters::StatusFilter;
use crate::cli::helpers::{format_short_id, or_dash};
use crate::cli::output::{print_structured, print_tsv};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::context::{build_context, context_sources};
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;
use crate::entities::{Build, BuildStatus, Engine, Transmission, Vehicle};
use crate::export::BuildExport;
use crate::fitment::{evaluate_advisories, FitmentInput, Severity};

#[derive(Subcommand, Debug)]
pub enum BuildCommands {
    /// List builds
    List(ListArgs),

    /// Create a new build from a vehicle, an engine and optionally a transmission
    New(NewArgs),

    /// Show a build and the records it references
    Show(IdArgs),

    /// Change a build's status, transmission or collision data
    Update(UpdateArgs),

    /// Run the fitment checks for a build
    Check(IdArgs),

    /// Export a build with its records and recommendations
    Export(IdArgs),

    /// Print the advisor context for a build
    Context(IdArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilter,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Vehicle ID (any unique prefix)
    #[arg(long)]
    pub vehicle: String,

    /// Engine ID (any unique prefix)
    #[arg(long)]
    pub engine: String,

    /// Transmission ID (any unique prefix)
    #[arg(long)]
    pub trans: Option<String>,

    /// Build owner (defaults to the configured author)
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Build ID (any unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Build ID (any unique prefix)
    pub id: String,

    /// New status (draft or complete)
    #[arg(long)]
    pub status: Option<BuildStatus>,

    /// Transmission ID (any unique prefix)
    #[arg(long, conflicts_with = "no_trans")]
    pub trans: Option<String>,

    /// Remove the transmission from the build
    #[arg(long)]
    pub no_trans: bool,

    /// YAML or JSON file with collision findings (`collisions: [...]`)
    #[arg(long, conflicts_with = "clear_collisions")]
    pub collisions: Option<PathBuf>,

    /// Drop recorded collision data
    #[arg(long)]
    pub clear_collisions: bool,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Bld,
    name: "build",
    name_plural: "builds",
};

/// Run a build subcommand
pub fn run(cmd: BuildCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BuildCommands::List(args) => run_list(args, global),
        BuildCommands::New(args) => run_new(args, global),
        BuildCommands::Show(args) => run_show(args, global),
        BuildCommands::Update(args) => run_update(args),
        BuildCommands::Check(args) => run_check(args, global),
        BuildCommands::Export(args) => run_export(args, global),
        BuildCommands::Context(args) => run_context(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let builds: Vec<Build> = project
        .list::<Build>()?
        .into_iter()
        .filter(|b| args.status.matches(b.status))
        .collect();

    if args.count {
        println!("{}", builds.len());
        return Ok(());
    }

    print_list(
        &builds,
        &ENTITY_CONFIG,
        &["ID", "VEHICLE", "ENGINE", "TRANS", "STATUS", "OWNER"],
        |b| {
            vec![
                format_short_id(&b.id),
                format_short_id(&b.vehicle),
                format_short_id(&b.engine),
                or_dash(b.transmission.as_ref().map(format_short_id)),
                b.status.to_string(),
                b.owner.clone(),
            ]
        },
        output_format(global, &config),
    )
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let (vehicle, _) = project.load::<Vehicle>(&args.vehicle)?;
    let (engine, _) = project.load::<Engine>(&args.engine)?;
    let trans = args
        .trans
        .as_deref()
        .map(|id| project.load::<Transmission>(id))
        .transpose()?
        .map(|(t, _)| t);

    let owner = args.owner.unwrap_or_else(|| config.author());
    let mut build = Build::new(owner, vehicle.id.clone(), engine.id.clone());
    if let Some(t) = &trans {
        build = build.with_transmission(t.id.clone());
    }
    project.check_references(&build)?;

    let path = project.save(&build)?;
    let title = format!("{} into {}", engine.title(), vehicle.title());
    output_new_entity(
        &build.id,
        &path,
        ENTITY_CONFIG.name,
        &title,
        output_format(global, &config),
    );
    Ok(())
}

fn run_show(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));
    let bundle = project.load_bundle(&args.id)?;
    let build = &bundle.build;

    match output_format(global, &config) {
        OutputFormat::Id => println!("{}", build.id),
        OutputFormat::Json => print_structured(build, OutputFormat::Json)?,
        OutputFormat::Yaml => print_structured(build, OutputFormat::Yaml)?,
        OutputFormat::Auto | OutputFormat::Tsv => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&build.id).cyan());
            println!(
                "{}: {} {}",
                style("Vehicle").bold(),
                style(bundle.vehicle.title()).yellow(),
                style(format!("({})", bundle.vehicle.id)).dim()
            );
            println!(
                "{}: {} {}",
                style("Engine").bold(),
                style(bundle.engine.title()).yellow(),
                style(format!("({})", bundle.engine.id)).dim()
            );
            match &bundle.transmission {
                Some(t) => println!(
                    "{}: {} {}",
                    style("Transmission").bold(),
                    style(t.title()).yellow(),
                    style(format!("({})", t.id)).dim()
                ),
                None => println!("{}: {}", style("Transmission").bold(), style("none").dim()),
            }
            println!("{}: {}", style("Status").bold(), build.status);
            println!("{}: {}", style("Owner").bold(), build.owner);

            let collisions = build.collisions();
            if !collisions.is_empty() {
                println!();
                println!("{} ({}):", style("Collisions").bold(), collisions.len());
                for c in &collisions {
                    println!("  • {}", c);
                }
            }
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Created").dim(),
                build.created.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}

fn run_update(args: UpdateArgs) -> Result<()> {
    let project = open_project()?;
    let (mut build, _) = project.load::<Build>(&args.id)?;
    let mut changes = Vec::new();

    if let Some(status) = args.status {
        build.status = status;
        changes.push(format!("status={}", status));
    }

    if args.no_trans && build.transmission.take().is_some() {
        changes.push("transmission removed".to_string());
    }
    if let Some(query) = &args.trans {
        let (trans, _) = project.load::<Transmission>(query)?;
        changes.push(format!("transmission={}", trans.title()));
        build.transmission = Some(trans.id);
    }

    if args.clear_collisions && build.collision_data.take().is_some() {
        changes.push("collisions cleared".to_string());
    }
    if let Some(path) = &args.collisions {
        let content = fs::read_to_string(path).into_diagnostic()?;
        // YAML is a superset of JSON, so one parser reads both
        let data: serde_json::Value = serde_yml::from_str(&content)
            .map_err(|e| miette::miette!("invalid collision file {}: {}", path.display(), e))?;
        build.collision_data = Some(data);
        changes.push(format!("collisions={}", build.collisions().len()));
    }

    if changes.is_empty() {
        println!("{} Nothing to update", style("!").yellow());
        return Ok(());
    }

    project.check_references(&build)?;
    project.save(&build)?;
    println!(
        "{} Updated build {}: {}",
        style("✓").green(),
        style(format_short_id(&build.id)).cyan(),
        changes.join(", ")
    );
    Ok(())
}

fn severity_marker(severity: Severity) -> console::StyledObject<&'static str> {
    match severity {
        Severity::Critical => style("✗").red().bold(),
        Severity::Warning => style("!").yellow(),
        Severity::Info => style("i").cyan(),
    }
}

fn run_check(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));
    let bundle = project.load_bundle(&args.id)?;

    let input = FitmentInput::new(
        Some(&bundle.engine),
        Some(&bundle.vehicle),
        bundle.transmission.as_ref(),
        &bundle.build,
    );
    let advisories = evaluate_advisories(&input);

    match output_format(global, &config) {
        OutputFormat::Json => print_structured(&advisories, OutputFormat::Json)?,
        OutputFormat::Yaml => print_structured(&advisories, OutputFormat::Yaml)?,
        OutputFormat::Tsv => {
            let rows: Vec<Vec<String>> = advisories
                .iter()
                .map(|a| vec![a.rule.to_string(), a.severity.to_string(), a.message.clone()])
                .collect();
            print_tsv(&["RULE", "SEVERITY", "MESSAGE"], &rows);
        }
        OutputFormat::Id => {
            for advisory in &advisories {
                println!("{}", advisory.rule);
            }
        }
        OutputFormat::Auto => {
            println!(
                "{} {} into {}",
                style("Fitment check:").bold(),
                style(bundle.engine.title()).yellow(),
                style(bundle.vehicle.title()).yellow()
            );
            println!();
            if advisories.is_empty() {
                println!("{} No fitment issues found", style("✓").green());
                return Ok(());
            }
            for advisory in &advisories {
                println!("{} {}", severity_marker(advisory.severity), advisory.message);
                let basis: Vec<String> = advisory
                    .basis
                    .iter()
                    .map(|b| format!("{} [{}]", b.field, b.source))
                    .collect();
                if !basis.is_empty() {
                    println!("    {}", style(basis.join(", ")).dim());
                }
            }
            let critical = advisories
                .iter()
                .filter(|a| a.severity == Severity::Critical)
                .count();
            println!();
            println!(
                "{} advisory(ies), {} critical",
                style(advisories.len()).cyan(),
                style(critical).red()
            );
        }
    }
    Ok(())
}

fn run_export(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));
    let export = BuildExport::from_bundle(project.load_bundle(&args.id)?);

    match output_format(global, &config) {
        OutputFormat::Json => println!("{}", export.to_json().into_diagnostic()?),
        _ => print!("{}", export.to_yaml().into_diagnostic()?),
    }
    Ok(())
}

fn run_context(args: IdArgs) -> Result<()> {
    let project = open_project()?;
    let bundle = project.load_bundle(&args.id)?;

    let context = build_context(
        &bundle.build,
        Some(&bundle.engine),
        Some(&bundle.vehicle),
        bundle.transmission.as_ref(),
    );
    print!("{}", context);

    let sources = context_sources(
        Some(&bundle.engine),
        Some(&bundle.vehicle),
        bundle.transmission.as_ref(),
    );
    println!();
    println!("Sources:");
    for source in sources {
        println!("- {}", source);
    }
    Ok(())
}
