//! Engine entity type - a candidate swap engine and its published specs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, SpecRecord};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::provenance::SourceMap;

/// An engine spec record
///
/// Every spec value is optional: records start from whatever the contributor
/// knows and are filled in later by enrichment or manual edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    /// Unique identifier
    pub id: EntityId,

    pub make: String,

    pub model: String,

    /// Variant or RPO code (e.g., "L99", "2008 LS3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    // ----- Physical -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_in: Option<f64>,

    /// Dressed weight in pounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<f64>,

    // ----- Fuel & cooling requirements -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_pressure_psi: Option<f64>,

    /// Fuel flow at peak power, liters per hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_flow_lph: Option<f64>,

    /// Heat rejection the cooling system must handle, BTU/min
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_btu_min: Option<f64>,

    // ----- Output -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_hp: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torque_lb_ft: Option<u32>,

    // ----- Internals -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacement_liters: Option<f64>,

    /// Static compression ratio (x:1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,

    /// Valve train layout (e.g., "OHV", "DOHC")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valve_train: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bore_mm: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_mm: Option<f64>,

    /// Rotating assembly balance: "internal" or "external"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cam_timing: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redline_rpm: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_rpm: Option<u32>,

    // ----- Packaging geometry -----
    /// Sump depth below the crank centerline, inches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_pan_depth_in: Option<f64>,

    /// Front, mid or rear sump
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oil_pan_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_accessory_depth_in: Option<f64>,

    // ----- Thermal -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_system_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermostat_temp_f: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhaust_port_shape: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_od_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiator_rows: Option<u8>,

    // ----- Electronics -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_bus_protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecu_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter_position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributor_type: Option<String>,

    // ----- Structural -----
    /// Path or URL of a 3D mesh of the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_file: Option<String>,

    /// Mount point coordinates (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_points: Option<serde_json::Value>,

    /// Per-field provenance
    #[serde(default, skip_serializing_if = "SourceMap::is_empty")]
    pub sources: SourceMap,

    /// Free-text notes on where the numbers came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created: DateTime<Utc>,
}

impl Engine {
    /// Create an engine record with no specs filled in
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Eng),
            make: make.into(),
            model: model.into(),
            variant: None,
            length_in: None,
            width_in: None,
            height_in: None,
            weight_lbs: None,
            fuel_pressure_psi: None,
            fuel_flow_lph: None,
            cooling_btu_min: None,
            power_hp: None,
            torque_lb_ft: None,
            displacement_liters: None,
            compression_ratio: None,
            valve_train: None,
            bore_mm: None,
            stroke_mm: None,
            balance_type: None,
            cam_timing: None,
            redline_rpm: None,
            idle_rpm: None,
            oil_pan_depth_in: None,
            oil_pan_type: None,
            front_accessory_depth_in: None,
            cooling_system_type: None,
            thermostat_temp_f: None,
            exhaust_port_shape: None,
            header_od_in: None,
            radiator_rows: None,
            can_bus_protocol: None,
            ecu_type: None,
            starter_position: None,
            distributor_type: None,
            mesh_file: None,
            mount_points: None,
            sources: SourceMap::new(),
            notes: None,
            created: Utc::now(),
        }
    }

    /// True when the engine needs an externally balanced flywheel/flexplate
    pub fn is_externally_balanced(&self) -> bool {
        self.balance_type
            .as_deref()
            .is_some_and(|b| b.trim().eq_ignore_ascii_case("external"))
    }
}

impl Entity for Engine {
    const PREFIX: EntityPrefix = EntityPrefix::Eng;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        match &self.variant {
            Some(v) => format!("{} {} ({})", self.make, self.model, v),
            None => format!("{} {}", self.make, self.model),
        }
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl SpecRecord for Engine {
    const SPEC_FIELDS: &'static [&'static str] = &[
        "length_in",
        "width_in",
        "height_in",
        "weight_lbs",
        "fuel_pressure_psi",
        "fuel_flow_lph",
        "cooling_btu_min",
        "power_hp",
        "torque_lb_ft",
        "displacement_liters",
        "compression_ratio",
        "valve_train",
        "bore_mm",
        "stroke_mm",
        "balance_type",
        "cam_timing",
        "redline_rpm",
        "idle_rpm",
        "oil_pan_depth_in",
        "oil_pan_type",
        "front_accessory_depth_in",
        "cooling_system_type",
        "thermostat_temp_f",
        "exhaust_port_shape",
        "header_od_in",
        "radiator_rows",
        "can_bus_protocol",
        "ecu_type",
        "starter_position",
        "distributor_type",
    ];

    const STRUCTURAL_FIELDS: &'static [&'static str] = &[
        "id",
        "make",
        "model",
        "variant",
        "mesh_file",
        "mount_points",
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

    /// A model year embedded in the variant, e.g. "2008 L99" -> 2008
    fn year_hint(&self) -> Option<i32> {
        self.variant.as_deref().and_then(find_model_year)
    }

    fn trim_hint(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

/// Find a standalone 19xx/20xx year token in free text
fn find_model_year(text: &str) -> Option<i32> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .filter(|token| token.starts_with("19") || token.starts_with("20"))
        .find_map(|token| token.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provenance::SpecSource;

    #[test]
    fn test_engine_roundtrip() {
        let mut engine = Engine::new("Chevrolet", "LS3");
        engine.power_hp = Some(430);
        engine.compression_ratio = Some(10.7);
        engine.sources.insert("power_hp", SpecSource::UserContributed);

        let yaml = serde_yml::to_string(&engine).unwrap();
        let parsed: Engine = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(engine, parsed);
    }

    #[test]
    fn test_engine_omits_empty_fields() {
        let engine = Engine::new("Chevrolet", "LS3");
        let yaml = serde_yml::to_string(&engine).unwrap();
        assert!(!yaml.contains("fuel_pressure_psi"));
        assert!(!yaml.contains("sources"));
    }

    #[test]
    fn test_external_balance_detection() {
        let mut engine = Engine::new("Ford", "5.0 Windsor");
        assert!(!engine.is_externally_balanced());

        for value in ["external", "EXTERNAL", "External "] {
            engine.balance_type = Some(value.to_string());
            assert!(engine.is_externally_balanced(), "{value}");
        }

        engine.balance_type = Some("internal".to_string());
        assert!(!engine.is_externally_balanced());
    }

    #[test]
    fn test_spec_fields_exclude_structural() {
        for field in Engine::STRUCTURAL_FIELDS {
            assert!(!Engine::SPEC_FIELDS.contains(field), "{field}");
        }
    }

    #[test]
    fn test_year_hint_from_variant() {
        let mut engine = Engine::new("Chevrolet", "LS3");
        assert_eq!(engine.year_hint(), None);

        engine.variant = Some("2008 L99".to_string());
        assert_eq!(engine.year_hint(), Some(2008));

        engine.variant = Some("L99-12345".to_string());
        assert_eq!(engine.year_hint(), None);
    }

    #[test]
    fn test_engine_title() {
        let mut engine = Engine::new("Toyota", "2JZ-GTE");
        assert_eq!(engine.title(), "Toyota 2JZ-GTE");
        engine.variant = Some("VVT-i".to_string());
        assert_eq!(engine.title(), "Toyota 2JZ-GTE (VVT-i)");
    }
}
