//! Advisor context - a plain-text summary of one build for a chat assistant
//!
//! Every spec value is printed with its provenance label, e.g.
//! `58 psi [manufacturer]`, so the assistant can tell verified numbers from
//! user guesses. Values without a recorded source are labelled `[UNKNOWN]`.

use std::fmt::{Display, Write};

use crate::core::provenance::SourceMap;
use crate::entities::{Build, Engine, Transmission, Vehicle};
use crate::fitment::{evaluate_advisories, FitmentInput};

/// Placeholder for missing values
pub const NOT_AVAILABLE: &str = "N/A";

/// Format one spec value with its unit and source label
pub fn format_spec<V: Display>(
    value: Option<V>,
    unit: &str,
    sources: &SourceMap,
    field: &str,
) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{} [{}]", v, sources.label(field)),
        Some(v) => format!("{} {} [{}]", v, unit, sources.label(field)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn vehicle_line(vehicle: Option<&Vehicle>) -> String {
    match vehicle {
        Some(v) => match v.trim.as_deref().filter(|t| !t.is_empty()) {
            Some(trim) => format!("{} {} {} {}", v.year, v.make, v.model, trim),
            None => format!("{} {} {}", v.year, v.make, v.model),
        },
        None => "Unknown vehicle".to_string(),
    }
}

fn engine_line(engine: Option<&Engine>) -> String {
    let Some(e) = engine else {
        return "Unknown engine".to_string();
    };
    let mut line = format!("{} {}", e.make, e.model);
    if let Some(variant) = &e.variant {
        let _ = write!(line, " ({})", variant);
    }
    if let Some(hp) = e.power_hp {
        let _ = write!(line, " - {}hp", hp);
    }
    line
}

fn transmission_line(transmission: Option<&Transmission>) -> String {
    match transmission {
        Some(t) => match &t.bellhousing_pattern {
            Some(pattern) => format!("{} {} (Pattern: {})", t.make, t.model, pattern),
            None => format!("{} {}", t.make, t.model),
        },
        None => "None selected".to_string(),
    }
}

fn engine_specs(e: &Engine) -> String {
    let s = &e.sources;
    let mut out = String::from("Engine Specifications:\n");
    let _ = writeln!(
        out,
        "- Dimensions: {} L x {} W x {} H",
        format_spec(e.length_in, "in", s, "length_in"),
        format_spec(e.width_in, "in", s, "width_in"),
        format_spec(e.height_in, "in", s, "height_in"),
    );
    let _ = writeln!(out, "- Weight: {}", format_spec(e.weight_lbs, "lbs", s, "weight_lbs"));
    let _ = writeln!(
        out,
        "- Fuel Requirements: {}, {}",
        format_spec(e.fuel_pressure_psi, "psi", s, "fuel_pressure_psi"),
        format_spec(e.fuel_flow_lph, "lph", s, "fuel_flow_lph"),
    );
    let _ = writeln!(
        out,
        "- Cooling Requirement: {}",
        format_spec(e.cooling_btu_min, "BTU/min", s, "cooling_btu_min")
    );
    let _ = writeln!(
        out,
        "- Power: {} / {}",
        format_spec(e.power_hp, "hp", s, "power_hp"),
        format_spec(e.torque_lb_ft, "lb-ft", s, "torque_lb_ft"),
    );
    let _ = writeln!(
        out,
        "- Balance: {}",
        format_spec(e.balance_type.as_deref(), "", s, "balance_type")
    );
    let _ = writeln!(
        out,
        "- CAN Bus: {}",
        format_spec(e.can_bus_protocol.as_deref(), "", s, "can_bus_protocol")
    );
    out
}

fn vehicle_specs(v: &Vehicle) -> String {
    let s = &v.sources;
    let mut out = String::from("Engine Bay:\n");
    let _ = writeln!(
        out,
        "- Bay: {} L x {} W x {} H",
        format_spec(v.bay_length_in, "in", s, "bay_length_in"),
        format_spec(v.bay_width_in, "in", s, "bay_width_in"),
        format_spec(v.bay_height_in, "in", s, "bay_height_in"),
    );
    let _ = writeln!(
        out,
        "- Driveline Angle: {}",
        format_spec(v.driveline_angle_deg, "deg", s, "driveline_angle_deg")
    );
    let _ = writeln!(
        out,
        "- Ground Clearance: {}",
        format_spec(v.stock_ground_clearance_in, "in", s, "stock_ground_clearance_in")
    );
    out
}

/// Summary lines naming the records the context was built from
pub fn context_sources(
    engine: Option<&Engine>,
    vehicle: Option<&Vehicle>,
    transmission: Option<&Transmission>,
) -> Vec<String> {
    let mut sources = Vec::new();
    if let Some(e) = engine {
        sources.push(format!("Engine specs: {} {}", e.make, e.model));
    }
    if let Some(v) = vehicle {
        sources.push(format!("Vehicle data: {} {} {}", v.year, v.make, v.model));
    }
    if let Some(t) = transmission {
        sources.push(format!("Transmission specs: {} {}", t.make, t.model));
    }
    sources
}

/// Build the context string for one build
pub fn build_context(
    build: &Build,
    engine: Option<&Engine>,
    vehicle: Option<&Vehicle>,
    transmission: Option<&Transmission>,
) -> String {
    let collisions = build.collisions();
    let collision_info = if collisions.is_empty() {
        "No collisions detected".to_string()
    } else {
        collisions.join("; ")
    };

    let mut out = String::from("Current Build Context:\n");
    let _ = writeln!(out, "- Vehicle: {}", vehicle_line(vehicle));
    let _ = writeln!(out, "- Engine: {}", engine_line(engine));
    let _ = writeln!(out, "- Transmission: {}", transmission_line(transmission));
    let _ = writeln!(out, "- Build Status: {}", build.status);
    let _ = writeln!(out, "- Current Collisions: {}", collision_info);

    if let Some(e) = engine {
        out.push('\n');
        out.push_str(&engine_specs(e));
    }
    if let Some(v) = vehicle {
        out.push('\n');
        out.push_str(&vehicle_specs(v));
    }

    let input = FitmentInput::new(engine, vehicle, transmission, build);
    let advisories = evaluate_advisories(&input);
    if !advisories.is_empty() {
        out.push_str("\nFitment Advisories:\n");
        for advisory in &advisories {
            let _ = writeln!(out, "- [{}] {}", advisory.severity, advisory.message);
        }
    }

    out
}
