//! Shared entity command infrastructure
//!
//! Engines, vehicles and transmissions share their show/set/enrich/list
//! plumbing; only field selection and pretty headers differ per kind.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::cli::helpers::format_short_id;
use crate::cli::output::{effective_format, print_structured, print_tsv};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::{Entity, SpecRecord};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::Project;
use crate::core::provenance::{apply_user_edit, record_fields};
use crate::enrich::{enrich, CatalogProvider, EnrichOutcome, SkipReason};

// =========================================================================
// Entity Configuration
// =========================================================================

/// Static configuration for an entity type
pub struct EntityConfig {
    pub prefix: EntityPrefix,
    /// Singular name for messages (e.g., "engine")
    pub name: &'static str,
    /// Plural name for messages (e.g., "engines")
    pub name_plural: &'static str,
}

/// Find the enclosing project or fail with a readable error
pub fn open_project() -> Result<Project> {
    Project::discover().map_err(|e| miette::miette!("{}", e))
}

/// Effective output format for this invocation, honoring `default_format`
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    crate::cli::output::resolve_format(global.format, config)
}

// =========================================================================
// Show
// =========================================================================

/// Print every set spec field with its source label
pub fn print_spec_fields<T: SpecRecord>(record: &T) -> Result<()> {
    let fields = record_fields(record).into_diagnostic()?;
    let width = T::SPEC_FIELDS.iter().map(|f| f.len()).max().unwrap_or(0);

    let mut unset = Vec::new();
    for field in T::SPEC_FIELDS {
        match fields.get(*field).filter(|v| !v.is_null()) {
            Some(value) => {
                let label = record.sources().label(field);
                let label = if record.sources().contains(field) {
                    style(label).green()
                } else {
                    style(label).red()
                };
                println!(
                    "  {:<width$}  {}  [{}]",
                    field,
                    style(display_value(value)).yellow(),
                    label,
                    width = width
                );
            }
            None => unset.push(*field),
        }
    }

    if !unset.is_empty() {
        println!();
        println!("{} {}", style("Not set:").dim(), style(unset.join(", ")).dim());
    }
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Show a spec record in the requested format
///
/// `header` prints the kind-specific title block for pretty output.
pub fn run_show_generic<T: SpecRecord>(
    id: &str,
    global: &GlobalOpts,
    header: impl Fn(&T),
) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));
    let (record, path) = project.load::<T>(id)?;

    match output_format(global, &config) {
        OutputFormat::Id => println!("{}", record.id()),
        OutputFormat::Json => print_structured(&record, OutputFormat::Json)?,
        OutputFormat::Yaml => {
            let content = fs::read_to_string(&path).into_diagnostic()?;
            print!("{}", content);
        }
        OutputFormat::Auto | OutputFormat::Tsv => {
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("ID").bold(),
                style(record.id().to_string()).cyan()
            );
            header(&record);
            println!("{}", style("─".repeat(60)).dim());
            print_spec_fields(&record)?;
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Created").dim(),
                record.created().format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}

// =========================================================================
// Set
// =========================================================================

/// Set one spec field from the command line and retag it user-contributed
pub fn run_set_generic<T: SpecRecord>(id: &str, field: &str, value: &str) -> Result<()> {
    let project = open_project()?;
    let (mut record, _) = project.load::<T>(id)?;

    apply_user_edit(&mut record, field, value).map_err(|e| miette::miette!("{}", e))?;
    project.save(&record)?;

    println!(
        "{} Set {} on {} to {} [{}]",
        style("✓").green(),
        style(field).cyan(),
        style(format_short_id(record.id())).cyan(),
        style(value).yellow(),
        record.sources().label(field)
    );
    Ok(())
}

/// Apply `--spec FIELD=VALUE` pairs to a new record
pub fn apply_spec_pairs<T: SpecRecord>(record: &mut T, pairs: &[(String, String)]) -> Result<()> {
    for (field, value) in pairs {
        apply_user_edit(record, field, value).map_err(|e| miette::miette!("{}", e))?;
    }
    Ok(())
}

// =========================================================================
// Enrich
// =========================================================================

/// Enrich a record from the project's spec catalog
///
/// A missing or invalid catalog is reported as a skipped outcome.
pub fn enrich_from_catalog<T: SpecRecord>(
    record: &mut T,
    project: &Project,
    config: &Config,
) -> EnrichOutcome {
    let path = config.catalog_path(project);
    match CatalogProvider::load(&path) {
        Ok(provider) => enrich(record, &provider),
        Err(e) => {
            tracing::warn!(error = %e, "spec catalog unavailable");
            EnrichOutcome::Skipped(SkipReason::ProviderFailed(e.to_string()))
        }
    }
}

/// Print an enrichment outcome
pub fn print_enrich_outcome(outcome: &EnrichOutcome) {
    match outcome {
        EnrichOutcome::Enriched {
            provider,
            fields,
            confidence,
        } => {
            println!(
                "   {} Enriched {} field(s) from {} ({} confidence): {}",
                style("+").green(),
                fields.len(),
                style(provider).cyan(),
                confidence,
                fields.join(", ")
            );
        }
        EnrichOutcome::Skipped(reason) => {
            println!("   {} Enrichment skipped: {}", style("-").dim(), reason);
        }
    }
}

/// Load, enrich and save a record
pub fn run_enrich_generic<T: SpecRecord>(id: &str, global: &GlobalOpts) -> Result<()> {
    let project = open_project()?;
    let config = Config::load(Some(&project));
    let (mut record, _) = project.load::<T>(id)?;

    let outcome = enrich_from_catalog(&mut record, &project, &config);
    if matches!(outcome, EnrichOutcome::Enriched { .. }) {
        project.save(&record)?;
    }

    match output_format(global, &config) {
        OutputFormat::Id => {
            for field in outcome.filled() {
                println!("{}", field);
            }
        }
        _ => {
            println!(
                "{} {}",
                style(format_short_id(record.id())).cyan(),
                record.title()
            );
            print_enrich_outcome(&outcome);
        }
    }
    Ok(())
}

// =========================================================================
// New / List Output Helpers
// =========================================================================

/// Output for a newly created entity
pub fn output_new_entity(
    id: &EntityId,
    file_path: &Path,
    entity_name: &str,
    title: &str,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Id => {
            println!("{}", id);
        }
        _ => {
            println!(
                "{} Created {} {}",
                style("✓").green(),
                entity_name,
                style(id.to_string()).cyan()
            );
            println!("   {}", style(file_path.display()).dim());
            println!("   {}", style(title).yellow());
        }
    }
}

/// Print records in list form
///
/// `row` produces the TSV cells matching `headers`.
pub fn print_list<T: Entity>(
    records: &[T],
    config: &EntityConfig,
    headers: &[&str],
    row: impl Fn(&T) -> Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    match effective_format(format, true) {
        OutputFormat::Json | OutputFormat::Yaml => {
            print_structured(records, effective_format(format, true))?;
        }
        OutputFormat::Id => {
            for record in records {
                println!("{}", record.id());
            }
        }
        _ => {
            if records.is_empty() {
                println!("No {} found.", config.name_plural);
                return Ok(());
            }
            let rows: Vec<Vec<String>> = records.iter().map(row).collect();
            print_tsv(headers, &rows);
            if format == OutputFormat::Auto {
                println!();
                println!(
                    "{} {}(s) found. IDs may be abbreviated to any unique prefix.",
                    style(records.len()).cyan(),
                    config.name
                );
            }
        }
    }
    Ok(())
}
