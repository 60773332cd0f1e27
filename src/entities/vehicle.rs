//! Vehicle entity type - a recipient chassis and its engine-bay geometry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, SpecRecord};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::provenance::SourceMap;

/// Community review state of a contributed vehicle record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityStatus::Pending => write!(f, "pending"),
            QualityStatus::Approved => write!(f, "approved"),
            QualityStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for QualityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(QualityStatus::Pending),
            "approved" => Ok(QualityStatus::Approved),
            "rejected" => Ok(QualityStatus::Rejected),
            _ => Err(format!(
                "Invalid quality status: {}. Use pending, approved, or rejected",
                s
            )),
        }
    }
}

/// A vehicle spec record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: EntityId,

    pub year: i32,

    pub make: String,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,

    /// Partial VIN identifying this body/trim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin_pattern: Option<String>,

    // ----- Engine bay -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bay_length_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bay_width_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bay_height_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_to_radiator_in: Option<f64>,

    // ----- Driveline -----
    /// Stock driveline operating angle, degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driveline_angle_deg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel_width_in: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunnel_height_in: Option<f64>,

    // ----- Chassis -----
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curb_weight_lbs: Option<f64>,

    /// Stock front axle share of curb weight, percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_weight_pct: Option<f64>,

    /// Rack-and-pinion, recirculating ball, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering_clearance_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_ground_clearance_in: Option<f64>,

    // ----- Structural -----
    /// Path or URL of a 3D scan of the empty bay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bay_scan_mesh: Option<String>,

    /// Known modifications to the chassis (opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifications: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "SourceMap::is_empty")]
    pub sources: SourceMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub quality_status: QualityStatus,

    /// Who contributed the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,

    pub created: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(year: i32, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Veh),
            year,
            make: make.into(),
            model: model.into(),
            trim: None,
            vin_pattern: None,
            bay_length_in: None,
            bay_width_in: None,
            bay_height_in: None,
            firewall_to_radiator_in: None,
            driveline_angle_deg: None,
            tunnel_width_in: None,
            tunnel_height_in: None,
            curb_weight_lbs: None,
            front_weight_pct: None,
            steering_type: None,
            steering_clearance_notes: None,
            stock_ground_clearance_in: None,
            bay_scan_mesh: None,
            modifications: None,
            sources: SourceMap::new(),
            notes: None,
            quality_status: QualityStatus::Pending,
            contributor: None,
            created: Utc::now(),
        }
    }
}

impl Entity for Vehicle {
    const PREFIX: EntityPrefix = EntityPrefix::Veh;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        match &self.trim {
            Some(t) => format!("{} {} {} {}", self.year, self.make, self.model, t),
            None => format!("{} {} {}", self.year, self.make, self.model),
        }
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

impl SpecRecord for Vehicle {
    const SPEC_FIELDS: &'static [&'static str] = &[
        "bay_length_in",
        "bay_width_in",
        "bay_height_in",
        "firewall_to_radiator_in",
        "driveline_angle_deg",
        "tunnel_width_in",
        "tunnel_height_in",
        "curb_weight_lbs",
        "front_weight_pct",
        "steering_type",
        "steering_clearance_notes",
        "stock_ground_clearance_in",
    ];

    const STRUCTURAL_FIELDS: &'static [&'static str] = &[
        "id",
        "year",
        "make",
        "model",
        "trim",
        "vin_pattern",
        "bay_scan_mesh",
        "modifications",
        "sources",
        "notes",
        "quality_status",
        "contributor",
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

    fn year_hint(&self) -> Option<i32> {
        Some(self.year)
    }

    fn trim_hint(&self) -> Option<&str> {
        self.trim.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_defaults_to_pending_review() {
        let vehicle = Vehicle::new(1989, "Mazda", "MX-5");
        assert_eq!(vehicle.quality_status, QualityStatus::Pending);
    }

    #[test]
    fn test_vehicle_without_quality_status_deserializes() {
        let yaml = r#"
id: VEH-01HQ5V2KRMJ0B9XYZ3NTWPGQ4E
year: 1989
make: Mazda
model: MX-5
bay_length_in: 27.5
created: "2024-01-01T00:00:00Z"
"#;
        let vehicle: Vehicle = serde_yml::from_str(yaml).unwrap();
        assert_eq!(vehicle.quality_status, QualityStatus::Pending);
        assert_eq!(vehicle.bay_length_in, Some(27.5));
        assert!(vehicle.sources.is_empty());
    }

    #[test]
    fn test_quality_status_from_str() {
        assert_eq!("APPROVED".parse::<QualityStatus>().unwrap(), QualityStatus::Approved);
        assert_eq!("rejected".parse::<QualityStatus>().unwrap(), QualityStatus::Rejected);
        assert!("maybe".parse::<QualityStatus>().is_err());
    }

    #[test]
    fn test_vehicle_title() {
        let mut vehicle = Vehicle::new(1989, "Mazda", "MX-5");
        assert_eq!(vehicle.title(), "1989 Mazda MX-5");
        vehicle.trim = Some("Miata".to_string());
        assert_eq!(vehicle.title(), "1989 Mazda MX-5 Miata");
    }

    #[test]
    fn test_unknown_source_tag_rejected_on_parse() {
        let yaml = r#"
id: VEH-01HQ5V2KRMJ0B9XYZ3NTWPGQ4E
year: 1989
make: Mazda
model: MX-5
bay_length_in: 27.5
sources:
  bay_length_in: somebody_said_so
created: "2024-01-01T00:00:00Z"
"#;
        assert!(serde_yml::from_str::<Vehicle>(yaml).is_err());
    }
}
