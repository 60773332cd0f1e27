//! `swapspec vehicle` command - Vehicle spec records and community review

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::entity_cmd::{
    apply_spec_pairs, enrich_from_catalog, open_project, output_format, output_new_entity,
    print_enrich_outcome, print_list, run_enrich_generic, run_set_generic, run_show_generic,
    EntityConfig,
};
use crate::cli::filters::QualityFilter;
use crate::cli::helpers::{format_short_id, or_dash, parse_key_value};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::identity::EntityPrefix;
use crate::core::provenance::annotate_record;
use crate::entities::{QualityStatus, Vehicle};

#[derive(Subcommand, Debug)]
pub enum VehicleCommands {
    /// List vehicles
    List(ListArgs),

    /// Create a new vehicle
    New(NewArgs),

    /// Show a vehicle's specs with their sources
    Show(ShowArgs),

    /// Set one spec field (marks it user-contributed)
    Set(SetArgs),

    /// Fill empty spec fields from the spec catalog
    Enrich(EnrichArgs),

    /// Approve or reject a contributed vehicle record
    Review(ReviewArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by review status
    #[arg(long, short = 'q', default_value = "active")]
    pub quality: QualityFilter,

    /// Filter by make (case-insensitive)
    #[arg(long)]
    pub make: Option<String>,

    /// Filter by model year
    #[arg(long)]
    pub year: Option<i32>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub make: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub trim: Option<String>,

    #[arg(long)]
    pub vin_pattern: Option<String>,

    /// Engine bay length (inches)
    #[arg(long)]
    pub bay_length: Option<f64>,

    /// Engine bay width (inches)
    #[arg(long)]
    pub bay_width: Option<f64>,

    /// Engine bay height (inches)
    #[arg(long)]
    pub bay_height: Option<f64>,

    /// Stock driveline angle (degrees)
    #[arg(long)]
    pub driveline_angle: Option<f64>,

    /// Stock ground clearance (inches)
    #[arg(long)]
    pub ground_clearance: Option<f64>,

    /// Curb weight (lbs)
    #[arg(long)]
    pub curb_weight: Option<f64>,

    /// Any other spec field, as FIELD=VALUE (repeatable)
    #[arg(long = "spec", value_parser = parse_key_value)]
    pub specs: Vec<(String, String)>,

    /// Contributor name (defaults to the configured author)
    #[arg(long)]
    pub contributor: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Skip catalog enrichment even when auto_enrich is on
    #[arg(long)]
    pub no_enrich: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Vehicle ID (any unique prefix)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Vehicle ID (any unique prefix)
    pub id: String,

    /// Spec field name (e.g., bay_length_in)
    pub field: String,

    /// New value; `null` clears the field
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct EnrichArgs {
    /// Vehicle ID (any unique prefix)
    pub id: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl From<ReviewDecision> for QualityStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approve => QualityStatus::Approved,
            ReviewDecision::Reject => QualityStatus::Rejected,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ReviewArgs {
    /// Vehicle ID (any unique prefix)
    pub id: String,

    pub decision: ReviewDecision,
}

const ENTITY_CONFIG: EntityConfig = EntityConfig {
    prefix: EntityPrefix::Veh,
    name: "vehicle",
    name_plural: "vehicles",
};

/// Run a vehicle subcommand
pub fn run(cmd: VehicleCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        VehicleCommands::List(args) => run_list(args, global),
        VehicleCommands::New(args) => run_new(args, global),
        VehicleCommands::Show(args) => run_show(args, global),
        VehicleCommands::Set(args) => {
            run_set_generic::<Vehicle>(&args.id, &args.field, &args.value)
        }
        VehicleCommands::Enrich(args) => run_enrich_generic::<Vehicle>(&args.id, global),
        VehicleCommands::Review(args) => run_review(args),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let vehicles: Vec<Vehicle> = project
        .list::<Vehicle>()?
        .into_iter()
        .filter(|v| args.quality.matches(v.quality_status))
        .filter(|v| {
            args.make
                .as_deref()
                .is_none_or(|m| v.make.eq_ignore_ascii_case(m.trim()))
        })
        .filter(|v| args.year.is_none_or(|y| v.year == y))
        .collect();

    if args.count {
        println!("{}", vehicles.len());
        return Ok(());
    }

    print_list(
        &vehicles,
        &ENTITY_CONFIG,
        &["ID", "YEAR", "MAKE", "MODEL", "TRIM", "QUALITY"],
        |v| {
            vec![
                format_short_id(&v.id),
                v.year.to_string(),
                v.make.clone(),
                v.model.clone(),
                or_dash(v.trim.as_deref()),
                v.quality_status.to_string(),
            ]
        },
        output_format(global, &config),
    )
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));

    let mut vehicle = Vehicle::new(args.year, args.make.trim(), args.model.trim());
    vehicle.trim = args.trim;
    vehicle.vin_pattern = args.vin_pattern;
    vehicle.bay_length_in = args.bay_length;
    vehicle.bay_width_in = args.bay_width;
    vehicle.bay_height_in = args.bay_height;
    vehicle.driveline_angle_deg = args.driveline_angle;
    vehicle.stock_ground_clearance_in = args.ground_clearance;
    vehicle.curb_weight_lbs = args.curb_weight;
    vehicle.notes = args.notes;
    vehicle.contributor = Some(args.contributor.unwrap_or_else(|| config.author()));

    vehicle.sources = annotate_record(&vehicle).into_diagnostic()?;
    apply_spec_pairs(&mut vehicle, &args.specs)?;

    let outcome = if config.auto_enrich() && !args.no_enrich {
        Some(enrich_from_catalog(&mut vehicle, &project, &config))
    } else {
        None
    };

    let path = project.save(&vehicle)?;
    let format = output_format(global, &config);
    output_new_entity(
        &vehicle.id,
        &path,
        ENTITY_CONFIG.name,
        &vehicle.title(),
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
    run_show_generic::<Vehicle>(&args.id, global, |vehicle| {
        println!(
            "{}: {}",
            style("Vehicle").bold(),
            style(vehicle.title()).yellow()
        );
        let quality = match vehicle.quality_status {
            QualityStatus::Approved => style(vehicle.quality_status.to_string()).green(),
            QualityStatus::Rejected => style(vehicle.quality_status.to_string()).red(),
            QualityStatus::Pending => style(vehicle.quality_status.to_string()).yellow(),
        };
        println!("{}: {}", style("Quality").bold(), quality);
        if let Some(contributor) = &vehicle.contributor {
            println!("{}: {}", style("Contributor").bold(), contributor);
        }
        if let Some(vin) = &vehicle.vin_pattern {
            println!("{}: {}", style("VIN pattern").bold(), vin);
        }
    })
}

fn run_review(args: ReviewArgs) -> Result<()> {
    let project = open_project()?;
    let (mut vehicle, _) = project.load::<Vehicle>(&args.id)?;

    let status = QualityStatus::from(args.decision);
    if vehicle.quality_status == status {
        println!(
            "{} {} is already {}",
            style("!").yellow(),
            style(format_short_id(&vehicle.id)).cyan(),
            status
        );
        return Ok(());
    }

    vehicle.quality_status = status;
    project.save(&vehicle)?;
    tracing::info!(id = %vehicle.id, status = %status, "vehicle reviewed");

    println!(
        "{} {} {} is now {}",
        style("✓").green(),
        style(format_short_id(&vehicle.id)).cyan(),
        vehicle.title(),
        style(status).yellow()
    );
    Ok(())
}
