//! `swapspec trans` command - Transmission spec records

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{
    apply_spec_pairs, enrich_from_catalog, open_project, output_format, output_new_entity,
    print_enrich_outcome, print_list, run_enrich_generic, run_set_generic, run_show_generic,
    EntityConfig,
};
use crate::cli::helpers::{format_short_id, or_dash, parse_key_value};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;
use crate::core::provenance::annotate_record;
use crate::entities::transmission::parse_gear_ratio;
use crate::entities::{Engine, Transmission};
use crate::fitment::bellhousing::compatible_transmissions;

#[derive(Subcommand, Debug)]
pub enum TransCommands {
    /// List transmissions
    List(ListArgs),

    /// Create a new transmission
    New(NewArgs),

    /// Show a transmission's specs with their sources
    Show(ShowArgs),

    /// Set one spec field (marks it user-contributed)
    Set(SetArgs),

    /// Fill empty spec fields from the spec catalog
    Enrich(EnrichArgs),

    /// List transmissions whose bellhousing fits an engine
    Compatible(CompatibleArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by bellhousing pattern (case-insensitive)
    #[arg(long)]
    pub bellhousing: Option<String>,

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

    /// Manual, automatic, DCT, ...
    #[arg(long = "type")]
    pub trans_type: Option<String>,

    /// Bellhousing bolt pattern (e.g., "GM LS")
    #[arg(long)]
    pub bellhousing: Option<String>,

    #[arg(long)]
    pub gears: Option<u8>,

    /// Gear ratio as GEAR=RATIO (repeatable), e.g. --gear 1=2.66
    #[arg(long = "gear", value_parser = parse_gear_ratio)]
    pub gear_ratios: Vec<(u8, f64)>,

    /// Maximum input torque (lb-ft)
    #[arg(long)]
    pub max_torque: Option<u32>,

    /// Weight (lbs)
    #[arg(long)]
    pub weight: Option<f64>,

    /// Length (inches)
    #[arg(long)]
    pub length: Option<f64>,

    /// Any other spec field, as FIELD=VALUE (repeatable)
    #[arg(long = "spec", value_parser = parse_key_value)]
    pub specs: Vec<(String, String)>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Skip catalog enrichment even when auto_enrich is on
    #[arg(long)]
    pub no_enrich: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Transmission ID (any unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Transmission ID (any unique prefix)
    pub id: String,

    /// Spec field name (e.g., max_torque_capacity_lb_ft)
    pub field: String,

    /// New value; `null` clears the field
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct EnrichArgs {
    /// Transmission ID (any unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct CompatibleArgs {
    /// Engine ID (any unique prefix)
    pub engine: String,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Trn,
    name: "transmission",
    name_plural: "transmissions",
};

/// Run a transmission subcommand
pub fn run(cmd: TransCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TransCommands::List(args) => run_list(args, global),
        TransCommands::New(args) => run_new(args, global),
        TransCommands::Show(args) => run_show(args, global),
        TransCommands::Set(args) => {
            run_set_generic::<Transmission>(&args.id, &args.field, &args.value)
        }
        TransCommands::Enrich(args) => run_enrich_generic::<Transmission>(&args.id, global),
        TransCommands::Compatible(args) => run_compatible(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let transmissions: Vec<Transmission> = project
        .list::<Transmission>()?
        .into_iter()
        .filter(|t| {
            args.bellhousing.as_deref().is_none_or(|want| {
                t.bellhousing_pattern
                    .as_deref()
                    .is_some_and(|have| have.trim().eq_ignore_ascii_case(want.trim()))
            })
        })
        .collect();

    if args.count {
        println!("{}", transmissions.len());
        return Ok(());
    }

    print_list(
        &transmissions,
        &ENTITY_CONFIG,
        &["ID", "MAKE", "MODEL", "TYPE", "BELLHOUSING", "MAX LB-FT"],
        |t| {
            vec![
                format_short_id(&t.id),
                t.make.clone(),
                t.model.clone(),
                or_dash(t.trans_type.as_deref()),
                or_dash(t.bellhousing_pattern.as_deref()),
                or_dash(t.max_torque_capacity_lb_ft),
            ]
        },
        output_format(global, &config),
    )
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let mut trans = Transmission::new(args.make.trim(), args.model.trim());
    trans.trans_type = args.trans_type;
    trans.bellhousing_pattern = args.bellhousing;
    trans.gear_ratios = args.gear_ratios.into_iter().collect();
    trans.gear_count = args.gears.or_else(|| {
        // Infer the count from ratios when not given
        u8::try_from(trans.gear_ratios.len())
            .ok()
            .filter(|n| *n > 0)
    });
    trans.max_torque_capacity_lb_ft = args.max_torque;
    trans.weight_lbs = args.weight;
    trans.length_in = args.length;
    trans.notes = args.notes;

    trans.sources = annotate_record(&trans).into_diagnostic()?;
    apply_spec_pairs(&mut trans, &args.specs)?;

    let outcome = if config.auto_enrich() && !args.no_enrich {
        Some(enrich_from_catalog(&mut trans, &project, &config))
    } else {
        None
    };

    let path = project.save(&trans)?;
    let format = output_format(global, &config);
    output_new_entity(
        &trans.id,
        &path,
        ENTITY_CONFIG.name,
        &trans.title(),
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
    run_show_generic::<Transmission>(&args.id, global, |trans| {
        println!(
            "{}: {}",
            style("Transmission").bold(),
            style(trans.title()).yellow()
        );
        if !trans.gear_ratios.is_empty() {
            let ratios: Vec<String> = trans
                .gear_ratios
                .iter()
                .map(|(gear, ratio)| format!("{}: {:.2}", gear, ratio))
                .collect();
            println!("{}: {}", style("Gear ratios").bold(), ratios.join(", "));
        }
    })
}

fn run_compatible(args: CompatibleArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));
    let (engine, _) = project.load::<Engine>(&args.engine)?;
    let all = project.list::<Transmission>()?;

    let compat = compatible_transmissions(&engine, &all);
    let matches: Vec<Transmission> = compat.transmissions.into_iter().cloned().collect();
    let format = output_format(global, &config);

    if format == OutputFormat::Auto {
        match compat.pattern {
            Some(pattern) => println!(
                "{} {} uses the {} bellhousing",
                style("Engine").bold(),
                style(engine.title()).yellow(),
                style(pattern).cyan()
            ),
            None => println!(
                "{} Unknown bellhousing for {}; showing every transmission",
                style("!").yellow(),
                engine.title()
            ),
        }
        println!();
    }

    print_list(
        &matches,
        &ENTITY_CONFIG,
        &["ID", "MAKE", "MODEL", "TYPE", "BELLHOUSING", "MAX LB-FT"],
        |t| {
            vec![
                format_short_id(&t.id),
                t.make.clone(),
                t.model.clone(),
                or_dash(t.trans_type.as_deref()),
                or_dash(t.bellhousing_pattern.as_deref()),
                or_dash(t.max_torque_capacity_lb_ft),
            ]
        },
        format,
    )
}
