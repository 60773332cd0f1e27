//! Entity traits - common interface for all record types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::provenance::SourceMap;

/// Common trait for all SwapSpec records
pub trait Entity: Serialize + DeserializeOwned {
    /// The record kind prefix
    const PREFIX: EntityPrefix;

    /// Get the record's unique ID
    fn id(&self) -> &EntityId;

    /// One-line display name (e.g., "Chevrolet LS3 (2008 L99)")
    fn title(&self) -> String;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;
}

/// A record whose nullable spec fields carry per-field provenance
///
/// Engines, vehicles and transmissions implement this; builds do not.
pub trait SpecRecord: Entity {
    /// Nullable spec fields, by serialized name, that provenance can be tracked for
    const SPEC_FIELDS: &'static [&'static str];

    /// Identity and structural fields that never receive a source tag
    const STRUCTURAL_FIELDS: &'static [&'static str];

    fn sources(&self) -> &SourceMap;

    fn sources_mut(&mut self) -> &mut SourceMap;

    fn make(&self) -> &str;

    fn model(&self) -> &str;

    /// Model year used to narrow spec lookups, if known
    fn year_hint(&self) -> Option<i32> {
        None
    }

    /// Trim or variant used to narrow spec lookups, if known
    fn trim_hint(&self) -> Option<&str> {
        None
    }
}
