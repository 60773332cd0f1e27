//! Build entity type - one engine swap project
//!
//! A build references its vehicle, engine and optional transmission by ID; it
//! does not own them. Engine position, accessory layout and collision findings
//! are produced elsewhere and stored here as opaque JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Key under which collision descriptions are listed in `collision_data`
pub const COLLISIONS_KEY: &str = "collisions";

/// Build project status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    #[default]
    Draft,
    Complete,
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStatus::Draft => write!(f, "draft"),
            BuildStatus::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for BuildStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(BuildStatus::Draft),
            "complete" => Ok(BuildStatus::Complete),
            _ => Err(format!("Invalid build status: {}. Use draft or complete", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: EntityId,

    /// Owner of the build
    pub owner: String,

    pub vehicle: EntityId,

    pub engine: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<EntityId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_position: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessory_config: Option<Value>,

    /// Interference findings from an external fitment check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_data: Option<Value>,

    #[serde(default)]
    pub status: BuildStatus,

    pub created: DateTime<Utc>,
}

impl Build {
    pub fn new(owner: impl Into<String>, vehicle: EntityId, engine: EntityId) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Bld),
            owner: owner.into(),
            vehicle,
            engine,
            transmission: None,
            engine_position: None,
            accessory_config: None,
            collision_data: None,
            status: BuildStatus::Draft,
            created: Utc::now(),
        }
    }

    pub fn with_transmission(mut self, transmission: EntityId) -> Self {
        self.transmission = Some(transmission);
        self
    }

    /// Collision descriptions in recorded order
    ///
    /// Anything other than an object with a `collisions` list yields nothing.
    /// Non-string entries are rendered as compact JSON.
    pub fn collisions(&self) -> Vec<String> {
        let Some(list) = self
            .collision_data
            .as_ref()
            .and_then(|data| data.get(COLLISIONS_KEY))
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        list.iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

impl Entity for Build {
    const PREFIX: EntityPrefix = EntityPrefix::Bld;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("{} into {}", self.engine, self.vehicle)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build() -> Build {
        Build::new(
            "tester",
            EntityId::new(EntityPrefix::Veh),
            EntityId::new(EntityPrefix::Eng),
        )
    }

    #[test]
    fn test_collisions_missing_data() {
        let b = build();
        assert!(b.collisions().is_empty());
    }

    #[test]
    fn test_collisions_malformed_shapes() {
        let mut b = build();
        for data in [
            json!({}),
            json!({"collisions": "steering shaft"}),
            json!({"collisions": null}),
            json!(["steering shaft"]),
            json!("steering shaft"),
        ] {
            b.collision_data = Some(data);
            assert!(b.collisions().is_empty());
        }
    }

    #[test]
    fn test_collisions_preserve_order() {
        let mut b = build();
        b.collision_data = Some(json!({
            "collisions": ["header vs steering shaft", {"part": "oil filter", "depth_in": 0.4}]
        }));
        let collisions = b.collisions();
        assert_eq!(collisions.len(), 2);
        assert_eq!(collisions[0], "header vs steering shaft");
        assert!(collisions[1].contains("oil filter"));
    }

    #[test]
    fn test_build_status_from_str() {
        assert_eq!("Complete".parse::<BuildStatus>().unwrap(), BuildStatus::Complete);
        assert!("finished".parse::<BuildStatus>().is_err());
    }

    #[test]
    fn test_build_roundtrip() {
        let b = build().with_transmission(EntityId::new(EntityPrefix::Trn));
        let yaml = serde_yml::to_string(&b).unwrap();
        let parsed: Build = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(b, parsed);
        assert!(yaml.contains("status: draft"));
    }
}
