//! Build export - a build, its records and its recommendations in one document

use serde::{Deserialize, Serialize};

use crate::core::store::BuildBundle;
use crate::entities::{Build, Engine, Transmission, Vehicle};
use crate::fitment::evaluate_fitment;

/// Everything a report renderer needs for one build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildExport {
    pub build: Build,
    pub vehicle: Vehicle,
    pub engine: Engine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
    /// Fitment advisories in evaluation order
    pub recommendations: Vec<String>,
}

impl BuildExport {
    pub fn from_bundle(bundle: BuildBundle) -> Self {
        let recommendations = evaluate_fitment(
            Some(&bundle.engine),
            Some(&bundle.vehicle),
            bundle.transmission.as_ref(),
            &bundle.build,
        );
        Self {
            build: bundle.build,
            vehicle: bundle.vehicle,
            engine: bundle.engine,
            transmission: bundle.transmission,
            recommendations,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
