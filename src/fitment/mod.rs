//! Fitment checks - engine/vehicle/transmission compatibility advisories
//!
//! [`evaluate_fitment`] runs every rule in a fixed order and returns the
//! advisory messages top to bottom: engine requirements first, then vehicle,
//! driveline, bay fitment math, data completeness, and finally collision
//! findings. The order is part of the contract; severity never reorders it.
//!
//! All rules are pure functions of their inputs. Evaluation does no I/O and
//! cannot fail.

pub mod bellhousing;
pub mod rules;

use serde::Serialize;

use crate::core::identity::EntityPrefix;
use crate::core::provenance::UNKNOWN_SOURCE;
use crate::entities::{Build, Engine, Transmission, Vehicle};

/// Records one evaluation reads
///
/// The build is always present; the referenced records may be missing when
/// the caller could not load them.
#[derive(Debug, Clone, Copy)]
pub struct FitmentInput<'a> {
    pub engine: Option<&'a Engine>,
    pub vehicle: Option<&'a Vehicle>,
    pub transmission: Option<&'a Transmission>,
    pub build: &'a Build,
}

/// How urgently an advisory should be addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Fitment rules in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    FuelPressure,
    FuelFlow,
    CoolingCapacity,
    EngineWeight,
    ExternalBalance,
    CompressionRatio,
    CanBus,
    OilPanClearance,
    DrivelineAngle,
    BayLength,
    BayWidth,
    TorqueCapacity,
    DataCompleteness,
    Collision,
}

/// Every rule, in the order advisories are reported
pub const RULES: [Rule; 14] = [
    Rule::FuelPressure,
    Rule::FuelFlow,
    Rule::CoolingCapacity,
    Rule::EngineWeight,
    Rule::ExternalBalance,
    Rule::CompressionRatio,
    Rule::CanBus,
    Rule::OilPanClearance,
    Rule::DrivelineAngle,
    Rule::BayLength,
    Rule::BayWidth,
    Rule::TorqueCapacity,
    Rule::DataCompleteness,
    Rule::Collision,
];

impl Rule {
    pub fn severity(self) -> Severity {
        match self {
            Rule::ExternalBalance => Severity::Critical,
            Rule::DataCompleteness => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Spec fields the rule reads, by record kind
    pub fn basis(self) -> &'static [(EntityPrefix, &'static str)] {
        use EntityPrefix::{Eng, Trn, Veh};
        match self {
            Rule::FuelPressure => &[(Eng, "fuel_pressure_psi")],
            Rule::FuelFlow => &[(Eng, "fuel_flow_lph")],
            Rule::CoolingCapacity => &[(Eng, "cooling_btu_min")],
            Rule::EngineWeight => &[(Eng, "weight_lbs")],
            Rule::ExternalBalance => &[(Eng, "balance_type")],
            Rule::CompressionRatio => &[(Eng, "compression_ratio")],
            Rule::CanBus => &[(Eng, "can_bus_protocol")],
            Rule::OilPanClearance => &[
                (Eng, "oil_pan_depth_in"),
                (Veh, "stock_ground_clearance_in"),
            ],
            Rule::DrivelineAngle => &[(Veh, "driveline_angle_deg")],
            Rule::BayLength => &[(Eng, "length_in"), (Veh, "bay_length_in")],
            Rule::BayWidth => &[(Eng, "width_in"), (Veh, "bay_width_in")],
            Rule::TorqueCapacity => &[
                (Eng, "torque_lb_ft"),
                (Trn, "max_torque_capacity_lb_ft"),
            ],
            Rule::DataCompleteness | Rule::Collision => &[],
        }
    }

    /// Run this rule, producing its messages (only collisions yield more than one)
    pub fn messages(self, input: &FitmentInput<'_>) -> Vec<String> {
        let single = match self {
            Rule::FuelPressure => rules::fuel_pressure(input),
            Rule::FuelFlow => rules::fuel_flow(input),
            Rule::CoolingCapacity => rules::cooling_capacity(input),
            Rule::EngineWeight => rules::engine_weight(input),
            Rule::ExternalBalance => rules::external_balance(input),
            Rule::CompressionRatio => rules::compression_ratio(input),
            Rule::CanBus => rules::can_bus(input),
            Rule::OilPanClearance => rules::oil_pan_clearance(input),
            Rule::DrivelineAngle => rules::driveline_angle(input),
            Rule::BayLength => rules::bay_length(input),
            Rule::BayWidth => rules::bay_width(input),
            Rule::TorqueCapacity => rules::torque_capacity(input),
            Rule::DataCompleteness => rules::data_completeness(input),
            Rule::Collision => return rules::collisions(input),
        };
        single.into_iter().collect()
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rule::FuelPressure => "fuel_pressure",
            Rule::FuelFlow => "fuel_flow",
            Rule::CoolingCapacity => "cooling_capacity",
            Rule::EngineWeight => "engine_weight",
            Rule::ExternalBalance => "external_balance",
            Rule::CompressionRatio => "compression_ratio",
            Rule::CanBus => "can_bus",
            Rule::OilPanClearance => "oil_pan_clearance",
            Rule::DrivelineAngle => "driveline_angle",
            Rule::BayLength => "bay_length",
            Rule::BayWidth => "bay_width",
            Rule::TorqueCapacity => "torque_capacity",
            Rule::DataCompleteness => "data_completeness",
            Rule::Collision => "collision",
        };
        write!(f, "{}", name)
    }
}

/// Provenance of one input value an advisory was based on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Basis {
    pub field: &'static str,
    /// Source tag, or `UNKNOWN`
    pub source: String,
}

/// One advisory with its rule, severity and input provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub rule: Rule,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub basis: Vec<Basis>,
}

impl<'a> FitmentInput<'a> {
    pub fn new(
        engine: Option<&'a Engine>,
        vehicle: Option<&'a Vehicle>,
        transmission: Option<&'a Transmission>,
        build: &'a Build,
    ) -> Self {
        Self {
            engine,
            vehicle,
            transmission,
            build,
        }
    }

    fn source_label(&self, prefix: EntityPrefix, field: &str) -> String {
        let sources = match prefix {
            EntityPrefix::Eng => self.engine.map(|e| &e.sources),
            EntityPrefix::Veh => self.vehicle.map(|v| &v.sources),
            EntityPrefix::Trn => self.transmission.map(|t| &t.sources),
            EntityPrefix::Bld => None,
        };
        sources
            .map(|s| s.label(field))
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }
}

/// Run every rule in order, keeping rule, severity and provenance
pub fn evaluate_advisories(input: &FitmentInput<'_>) -> Vec<Advisory> {
    RULES
        .iter()
        .flat_map(|rule| {
            let basis: Vec<Basis> = rule
                .basis()
                .iter()
                .map(|&(prefix, field)| Basis {
                    field,
                    source: input.source_label(prefix, field),
                })
                .collect();
            rule.messages(input).into_iter().map(move |message| Advisory {
                rule: *rule,
                severity: rule.severity(),
                message,
                basis: basis.clone(),
            })
        })
        .collect()
}

/// Ordered advisory messages for a swap
pub fn evaluate_fitment(
    engine: Option<&Engine>,
    vehicle: Option<&Vehicle>,
    transmission: Option<&Transmission>,
    build: &Build,
) -> Vec<String> {
    let input = FitmentInput::new(engine, vehicle, transmission, build);
    RULES
        .iter()
        .flat_map(|rule| rule.messages(&input))
        .collect()
}
