//! `swapspec engine` command - Engine spec records

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{
    apply_spec_pairs, enrich_from_catalog, open_project, output_format, output_new_entity,
    print_enrich_outcome, print_list, run_enrich_generic, run_set_generic, run_show_generic,
    EntityConfig,
};
use crate::cli::helpers::{format_short_id, or_dash, parse_key_value, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;
use crate::core::provenance::annotate_record;
use crate::entities::Engine;

#[derive(Subcommand, Debug)]
pub enum EngineCommands {
    /// List engines
    List(ListArgs),

    /// Create a new engine
    New(NewArgs),

    /// Show an engine's specs with their sources
    Show(ShowArgs),

    /// Set one spec field (marks it user-contributed)
    Set(SetArgs),

    /// Fill empty spec fields from the spec catalog
    Enrich(EnrichArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by make (case-insensitive)
    #[arg(long)]
    pub make: Option<String>,

    /// Search in make, model and variant
    #[arg(long)]
    pub search: Option<String>,

    /// Minimum horsepower (engines without a figure are excluded)
    #[arg(long)]
    pub min_hp: Option<u32>,

    /// Maximum horsepower (engines without a figure are excluded)
    #[arg(long)]
    pub max_hp: Option<u32>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[arg(long)]
    pub make: String,

    #[arg(long)]
    pub model: String,

    /// Variant or RPO code (a model year here narrows enrichment)
    #[arg(long)]
    pub variant: Option<String>,

    /// Length in inches
    #[arg(long)]
    pub length: Option<f64>,

    /// Width in inches
    #[arg(long)]
    pub width: Option<f64>,

    /// Height in inches
    #[arg(long)]
    pub height: Option<f64>,

    /// Dressed weight in pounds
    #[arg(long)]
    pub weight: Option<f64>,

    /// Required fuel pressure (psi)
    #[arg(long)]
    pub fuel_pressure: Option<f64>,

    /// Fuel flow at peak power (lph)
    #[arg(long)]
    pub fuel_flow: Option<f64>,

    /// Heat rejection (BTU/min)
    #[arg(long)]
    pub cooling: Option<f64>,

    #[arg(long)]
    pub power: Option<u32>,

    /// Torque (lb-ft)
    #[arg(long)]
    pub torque: Option<u32>,

    /// Displacement (liters)
    #[arg(long)]
    pub displacement: Option<f64>,

    #[arg(long)]
    pub compression: Option<f64>,

    #[arg(long)]
    pub valve_train: Option<String>,

    /// internal or external
    #[arg(long)]
    pub balance: Option<String>,

    /// Oil pan depth (inches)
    #[arg(long)]
    pub oil_pan_depth: Option<f64>,

    #[arg(long)]
    pub can_bus: Option<String>,

    /// Any other spec field, as FIELD=VALUE (repeatable)
    #[arg(long = "spec", value_parser = parse_key_value)]
    pub specs: Vec<(String, String)>,

    /// Where the numbers came from
    #[arg(long)]
    pub notes: Option<String>,

    /// Skip catalog enrichment even when auto_enrich is on
    #[arg(long)]
    pub no_enrich: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Engine ID (any unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Engine ID (any unique prefix)
    pub id: String,

    /// Spec field name (e.g., compression_ratio)
    pub field: String,

    /// New value; `null` clears the field
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct EnrichArgs {
    /// Engine ID (any unique prefix)
    pub id: String,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Eng,
    name: "engine",
    name_plural: "engines",
};

/// Run an engine subcommand
pub fn run(cmd: EngineCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        EngineCommands::List(args) => run_list(args, global),
        EngineCommands::New(args) => run_new(args, global),
        EngineCommands::Show(args) => run_show(args, global),
        EngineCommands::Set(args) => run_set_generic::<Engine>(&args.id, &args.field, &args.value),
        EngineCommands::Enrich(args) => run_enrich_generic::<Engine>(&args.id, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let search = args.search.as_deref().map(str::to_lowercase);
    let engines: Vec<Engine> = project
        .list::<Engine>()?
        .into_iter()
        .filter(|e| {
            args.make
                .as_deref()
                .is_none_or(|m| e.make.eq_ignore_ascii_case(m.trim()))
        })
        .filter(|e| hp_in_range(e.power_hp, args.min_hp, args.max_hp))
        .filter(|e| {
            search.as_deref().is_none_or(|q| {
                let haystack = format!(
                    "{} {} {}",
                    e.make,
                    e.model,
                    e.variant.as_deref().unwrap_or("")
                );
                haystack.to_lowercase().contains(q)
            })
        })
        .collect();

    if args.count {
        println!("{}", engines.len());
        return Ok(());
    }

    print_list(
        &engines,
        &ENTITY_CONFIG,
        &["ID", "MAKE", "MODEL", "VARIANT", "HP", "LB-FT", "SOURCED"],
        |e| {
            vec![
                format_short_id(&e.id),
                e.make.clone(),
                truncate_str(&e.model, 24),
                or_dash(e.variant.as_deref()),
                or_dash(e.power_hp),
                or_dash(e.torque_lb_ft),
                e.sources.len().to_string(),
            ]
        },
        output_format(global, &config),
    )
}

/// Whether a horsepower figure falls inside an inclusive range
fn hp_in_range(power: Option<u32>, min: Option<u32>, max: Option<u32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    power.is_some_and(|hp| min.is_none_or(|m| hp >= m) && max.is_none_or(|m| hp <= m))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let mut engine = Engine::new(args.make.trim(), args.model.trim());
    engine.variant = args.variant;
    engine.length_in = args.length;
    engine.width_in = args.width;
    engine.height_in = args.height;
    engine.weight_lbs = args.weight;
    engine.fuel_pressure_psi = args.fuel_pressure;
    engine.fuel_flow_lph = args.fuel_flow;
    engine.cooling_btu_min = args.cooling;
    engine.power_hp = args.power;
    engine.torque_lb_ft = args.torque;
    engine.displacement_liters = args.displacement;
    engine.compression_ratio = args.compression;
    engine.valve_train = args.valve_train;
    engine.balance_type = args.balance;
    engine.oil_pan_depth_in = args.oil_pan_depth;
    engine.can_bus_protocol = args.can_bus;
    engine.notes = args.notes;

    engine.sources = annotate_record(&engine).into_diagnostic()?;
    apply_spec_pairs(&mut engine, &args.specs)?;

    let outcome = if config.auto_enrich() && !args.no_enrich {
        Some(enrich_from_catalog(&mut engine, &project, &config))
    } else {
        None
    };

    let path = project.save(&engine)?;
    let format = output_format(global, &config);
    output_new_entity(
        &engine.id,
        &path,
        ENTITY_CONFIG.name,
        &engine.title(),
        format,
    );
    if format != OutputFormat::Id {
        if let Some(outcome) = &outcome {
            print_enrich_outcome(outcome);
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    run_show_generic::<Engine>(&args.id, global, |engine| {
        println!(
            "{}: {} {}",
            style("Engine").bold(),
            style(&engine.make).yellow(),
            style(&engine.model).yellow()
        );
        if let Some(variant) = &engine.variant {
            println!("{}: {}", style("Variant").bold(), variant);
        }
        if let Some(notes) = &engine.notes {
            println!("{}: {}", style("Notes").bold(), notes);
        }
    })
}
