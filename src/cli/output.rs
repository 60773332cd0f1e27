//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::config::Config;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Tsv
            } else {
                OutputFormat::Yaml
            }
        }
        other => other,
    }
}

/// Apply the configured default when no `--format` was given
pub fn resolve_format(format: OutputFormat, config: &Config) -> OutputFormat {
    if format != OutputFormat::Auto {
        return format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|name| <OutputFormat as clap::ValueEnum>::from_str(name, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Print a value as YAML or JSON
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(value).into_diagnostic()?;
        println!("{}", json);
    } else {
        let yaml = serde_yml::to_string(value).into_diagnostic()?;
        print!("{}", yaml);
    }
    Ok(())
}

/// Print rows as tab-separated values with a header line
pub fn print_tsv(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", headers.join("\t"));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace(['\t', '\n'], " ")).collect();
        println!("{}", cells.join("\t"));
    }
}
