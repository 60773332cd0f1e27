//! Transmission entity type - gearbox specs and mating interface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::entity::{Entity, SpecRecord};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::provenance::SourceMap;

/// A transmission spec record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transmission {
    pub id: EntityId,

    pub make: String,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<f64>,

    /// Engine-side mating standard (e.g., "GM LS", "Chevy small block")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bellhousing_pattern: Option<String>,

    /// Manual, automatic, DCT, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_count: Option<u8>,

    /// Gear number to ratio
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub gear_ratios: BTreeMap<u8, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_shaft_spline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_shaft_spline: Option<String>,

    /// Rated input torque, lb-ft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_torque_capacity_lb_ft: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_linkage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crossmember_drop_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailhousing_length_in: Option<f64>,

    /// Mechanical cable, VSS, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speedo_drive: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_file: Option<String>,

    #[serde(default, skip_serializing_if = "SourceMap::is_empty")]
    pub sources: SourceMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created: DateTime<Utc>,
}

impl Transmission {
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Trn),
            make: make.into(),
            model: model.into(),
            length_in: None,
            width_in: None,
            height_in: None,
            weight_lbs: None,
            bellhousing_pattern: None,
            trans_type: None,
            gear_count: None,
            gear_ratios: BTreeMap::new(),
            input_shaft_spline: None,
            output_shaft_spline: None,
            max_torque_capacity_lb_ft: None,
            shift_linkage: None,
            crossmember_drop_in: None,
            tailhousing_length_in: None,
            speedo_drive: None,
            mesh_file: None,
            sources: SourceMap::new(),
            notes: None,
            created: Utc::now(),
        }
    }

    /// Torque capacity usable as a divisor; zero is treated as unknown
    pub fn known_torque_capacity(&self) -> Option<u32> {
        self.max_torque_capacity_lb_ft.filter(|c| *c > 0)
    }
}

/// Parse a `GEAR=RATIO` pair such as `1=2.66`
pub fn parse_gear_ratio(s: &str) -> Result<(u8, f64), String> {
    let (gear, ratio) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid gear ratio '{}'. Use GEAR=RATIO, e.g. 1=2.66", s))?;
    let gear: u8 = gear
        .trim()
        .parse()
        .map_err(|_| format!("Invalid gear number '{}'", gear.trim()))?;
    let ratio: f64 = ratio
        .trim()
        .parse()
        .map_err(|_| format!("Invalid ratio '{}'", ratio.trim()))?;
    if ratio <= 0.0 {
        return Err(format!("Gear ratio must be positive, got {}", ratio));
    }
    Ok((gear, ratio))
}

impl Entity for Transmission {
    const PREFIX: EntityPrefix = EntityPrefix::Trn;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl SpecRecord for Transmission {
    const SPEC_FIELDS: &'static [&'static str] = &[
        "length_in",
        "width_in",
        "height_in",
        "weight_lbs",
        "bellhousing_pattern",
        "trans_type",
        "gear_count",
        "input_shaft_spline",
        "output_shaft_spline",
        "max_torque_capacity_lb_ft",
        "shift_linkage",
        "crossmember_drop_in",
        "tailhousing_length_in",
        "speedo_drive",
    ];

    const STRUCTURAL_FIELDS: &'static [&'static str] = &[
        "id",
        "make",
        "model",
        "gear_ratios",
        "mesh_file",
        "sources",
        "notes",
        "created",
    ];

    fn sources(&self) -> &SourceMap {
        &self.sources
    }

    fn sources_mut(&mut self) -> &mut SourceMap {
        &mut self.sources
    }

    fn make(&self) -> &str {
        &self.make
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_unknown() {
        let mut trans = Transmission::new("Tremec", "T56");
        assert_eq!(trans.known_torque_capacity(), None);

        trans.max_torque_capacity_lb_ft = Some(0);
        assert_eq!(trans.known_torque_capacity(), None);

        trans.max_torque_capacity_lb_ft = Some(450);
        assert_eq!(trans.known_torque_capacity(), Some(450));
    }

    #[test]
    fn test_parse_gear_ratio() {
        assert_eq!(parse_gear_ratio("1=2.66").unwrap(), (1, 2.66));
        assert_eq!(parse_gear_ratio(" 6 = 0.50 ").unwrap(), (6, 0.5));
        assert!(parse_gear_ratio("1:2.66").is_err());
        assert!(parse_gear_ratio("first=2.66").is_err());
        assert!(parse_gear_ratio("1=-1").is_err());
    }

    #[test]
    fn test_gear_ratios_roundtrip() {
        let mut trans = Transmission::new("Tremec", "T56");
        trans.gear_ratios.insert(1, 2.66);
        trans.gear_ratios.insert(6, 0.5);

        let yaml = serde_yml::to_string(&trans).unwrap();
        let parsed: Transmission = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.gear_ratios, trans.gear_ratios);
    }
}
