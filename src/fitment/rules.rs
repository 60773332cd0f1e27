//! Individual fitment rules
//!
//! Each rule reads a few fields of the swap and returns at most one advisory
//! message. A rule whose inputs are missing does not fire; only the data
//! completeness rule reports absence.

use super::FitmentInput;

/// Fuel pressure above which a returnless high-pressure system is needed, psi
pub const FUEL_PRESSURE_LIMIT_PSI: f64 = 40.0;

/// Fuel flow above which the pump and lines need upgrading, lph
pub const FUEL_FLOW_LIMIT_LPH: f64 = 200.0;

/// Heat rejection above which a stock radiator is unlikely to cope, BTU/min
pub const COOLING_LIMIT_BTU_MIN: f64 = 10_000.0;

/// Dressed weight above which frame mounting needs review, lbs
pub const ENGINE_WEIGHT_LIMIT_LBS: f64 = 500.0;

/// Compression ratio above which premium fuel is required
pub const COMPRESSION_LIMIT: f64 = 10.5;

/// Heuristic: sump depth may use at most this share of stock ground clearance.
/// Kept for compatibility with existing reports; tunable, not physically derived.
pub const OIL_PAN_CLEARANCE_FACTOR: f64 = 0.6;

/// U-joint operating angle limit, degrees
pub const DRIVELINE_ANGLE_LIMIT_DEG: f64 = 3.0;

/// Heuristic clearance margin between engine and bay, inches.
/// Kept for compatibility with existing reports; tunable, not physically derived.
pub const BAY_CLEARANCE_MARGIN_IN: f64 = 1.0;

/// Share of rated transmission torque above which the unit is marginal
pub const TORQUE_CAPACITY_LIMIT: f64 = 0.85;

/// At most this many collision findings are passed through
pub const MAX_COLLISION_ADVISORIES: usize = 3;

pub fn fuel_pressure(input: &FitmentInput<'_>) -> Option<String> {
    let psi = input.engine?.fuel_pressure_psi?;
    (psi > FUEL_PRESSURE_LIMIT_PSI).then(|| {
        format!(
            "High-pressure fuel system required: {} psi. \
             Consider a returnless fuel system with a matched regulator.",
            psi
        )
    })
}

pub fn fuel_flow(input: &FitmentInput<'_>) -> Option<String> {
    let lph = input.engine?.fuel_flow_lph?;
    (lph > FUEL_FLOW_LIMIT_LPH).then(|| {
        format!(
            "High fuel flow requirement: {} lph. \
             Upgrade the fuel pump and verify fuel line sizing.",
            lph
        )
    })
}

pub fn cooling_capacity(input: &FitmentInput<'_>) -> Option<String> {
    let btu = input.engine?.cooling_btu_min?;
    (btu > COOLING_LIMIT_BTU_MIN).then(|| {
        format!(
            "Significant cooling capacity needed: {} BTU/min. \
             Consider an aluminum radiator with electric fans.",
            btu
        )
    })
}

pub fn engine_weight(input: &FitmentInput<'_>) -> Option<String> {
    let weight = input.engine?.weight_lbs?;
    (weight > ENGINE_WEIGHT_LIMIT_LBS).then(|| {
        format!(
            "Engine weight: {} lbs. \
             Verify frame mounting and review front/rear weight distribution.",
            weight
        )
    })
}

pub fn external_balance(input: &FitmentInput<'_>) -> Option<String> {
    input.engine?.is_externally_balanced().then(|| {
        "CRITICAL: Engine uses external balance. Flywheel/flexplate MUST match \
         the engine's external balance specification. Using the wrong one will \
         cause severe vibration and potential crankshaft damage."
            .to_string()
    })
}

pub fn compression_ratio(input: &FitmentInput<'_>) -> Option<String> {
    let ratio = input.engine?.compression_ratio?;
    (ratio > COMPRESSION_LIMIT).then(|| {
        format!(
            "Compression ratio: {}:1. \
             Premium fuel (91+ octane) recommended to prevent detonation.",
            ratio
        )
    })
}

pub fn can_bus(input: &FitmentInput<'_>) -> Option<String> {
    let protocol = non_blank(input.engine?.can_bus_protocol.as_deref())?;
    Some(format!(
        "CAN bus protocol: {}. Wiring harness must be compatible \
         or a standalone ECU/CAN translator may be needed.",
        protocol
    ))
}

pub fn oil_pan_clearance(input: &FitmentInput<'_>) -> Option<String> {
    let depth = input.engine?.oil_pan_depth_in?;
    let clearance = input.vehicle?.stock_ground_clearance_in?;
    (depth > clearance * OIL_PAN_CLEARANCE_FACTOR).then(|| {
        format!(
            "Oil pan depth ({}\") may conflict with vehicle ground clearance ({}\"). \
             Consider a low-profile oil pan or crossmember modification.",
            depth, clearance
        )
    })
}

pub fn driveline_angle(input: &FitmentInput<'_>) -> Option<String> {
    let angle = input.vehicle?.driveline_angle_deg?;
    (angle > DRIVELINE_ANGLE_LIMIT_DEG).then(|| {
        format!(
            "Driveline angle: {}°. Angles over 3° may cause U-joint vibration. \
             Consider an adjustable crossmember or transmission mount.",
            angle
        )
    })
}

pub fn bay_length(input: &FitmentInput<'_>) -> Option<String> {
    let engine = input.engine?.length_in?;
    let bay = input.vehicle?.bay_length_in?;
    (engine > bay - BAY_CLEARANCE_MARGIN_IN).then(|| {
        format!(
            "Tight length fitment: engine is {}\" vs bay {}\". \
             May need firewall or radiator support modifications.",
            engine, bay
        )
    })
}

pub fn bay_width(input: &FitmentInput<'_>) -> Option<String> {
    let engine = input.engine?.width_in?;
    let bay = input.vehicle?.bay_width_in?;
    (engine > bay - BAY_CLEARANCE_MARGIN_IN).then(|| {
        format!(
            "Tight width fitment: engine is {}\" vs bay {}\". \
             Check header/exhaust manifold clearance to frame rails and steering components.",
            engine, bay
        )
    })
}

pub fn torque_capacity(input: &FitmentInput<'_>) -> Option<String> {
    let torque = input.engine?.torque_lb_ft?;
    let capacity = input.transmission?.known_torque_capacity()?;
    let ratio = torque_ratio(torque, capacity);
    (ratio > TORQUE_CAPACITY_LIMIT).then(|| {
        format!(
            "Engine torque ({} lb-ft) is at {}% of transmission capacity ({} lb-ft). \
             Consider upgrading internals or choosing a higher-capacity unit.",
            torque,
            capacity_percent(ratio),
            capacity
        )
    })
}

/// Engine torque as a share of transmission capacity
pub fn torque_ratio(torque_lb_ft: u32, capacity_lb_ft: u32) -> f64 {
    f64::from(torque_lb_ft) / f64::from(capacity_lb_ft)
}

/// Whole percentage, rounded down
pub fn capacity_percent(ratio: f64) -> u64 {
    (ratio * 100.0).floor() as u64
}

/// Engine specs every recommendation depends on, with display names
const CRITICAL_ENGINE_SPECS: [&str; 4] = [
    "displacement",
    "compression ratio",
    "valve train type",
    "CAN bus protocol",
];

/// Names of critical engine specs that are missing, in checklist order
pub fn missing_critical_specs(input: &FitmentInput<'_>) -> Vec<&'static str> {
    let Some(engine) = input.engine else {
        return Vec::new();
    };
    let present = [
        engine.displacement_liters.is_some(),
        engine.compression_ratio.is_some(),
        non_blank(engine.valve_train.as_deref()).is_some(),
        non_blank(engine.can_bus_protocol.as_deref()).is_some(),
    ];
    CRITICAL_ENGINE_SPECS
        .iter()
        .zip(present)
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

pub fn data_completeness(input: &FitmentInput<'_>) -> Option<String> {
    let missing = missing_critical_specs(input);
    (!missing.is_empty()).then(|| {
        format!(
            "Missing critical engine specs: {}. Run `swapspec engine enrich` or add \
             these manually for more accurate recommendations.",
            missing.join(", ")
        )
    })
}

/// The first few collision findings, in recorded order
pub fn collisions(input: &FitmentInput<'_>) -> Vec<String> {
    input
        .build
        .collisions()
        .into_iter()
        .take(MAX_COLLISION_ADVISORIES)
        .map(|c| format!("Fitment issue detected: {}", c))
        .collect()
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
