//! Spec provenance - where each stored spec value came from
//!
//! Every engine, vehicle and transmission keeps a [`SourceMap`] from spec field
//! name to a [`SpecSource`] tag. A field with no entry has unknown provenance and
//! is displayed as `UNKNOWN`; it is never assumed to be verified.
//!
//! Tags are written as `user_contributed`, `manufacturer` or
//! `verified:<provider>`. Any other string is rejected when a record is parsed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::entity::SpecRecord;

/// Label shown for fields without a recorded source
pub const UNKNOWN_SOURCE: &str = "UNKNOWN";

/// Provenance tag for one spec value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpecSource {
    /// Entered by a user when creating or editing the record
    UserContributed,
    /// Filled from an external lookup provider (e.g., "carquery_api")
    Verified(String),
    /// Published OEM/manufacturer data
    Manufacturer,
}

impl SpecSource {
    /// Tag for values filled by the given lookup provider
    pub fn verified(provider: impl Into<String>) -> Self {
        SpecSource::Verified(provider.into())
    }

    pub fn is_user_contributed(&self) -> bool {
        matches!(self, SpecSource::UserContributed)
    }
}

impl std::fmt::Display for SpecSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecSource::UserContributed => write!(f, "user_contributed"),
            SpecSource::Verified(provider) => write!(f, "verified:{}", provider),
            SpecSource::Manufacturer => write!(f, "manufacturer"),
        }
    }
}

impl std::str::FromStr for SpecSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "user_contributed" => return Ok(SpecSource::UserContributed),
            "manufacturer" => return Ok(SpecSource::Manufacturer),
            _ => {}
        }
        match s.split_once(':') {
            Some((kind, provider)) if kind.eq_ignore_ascii_case("verified") => {
                let provider = provider.trim();
                if provider.is_empty() {
                    Err("Verified source tag needs a provider, e.g. 'verified:carquery_api'".to_string())
                } else {
                    Ok(SpecSource::Verified(provider.to_string()))
                }
            }
            _ => Err(format!(
                "Invalid source tag: '{}'. Use 'user_contributed', 'manufacturer', or 'verified:<provider>'",
                s
            )),
        }
    }
}

impl TryFrom<String> for SpecSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpecSource> for String {
    fn from(value: SpecSource) -> Self {
        value.to_string()
    }
}

/// Field name to provenance tag, kept in field-name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap(BTreeMap<String, SpecSource>);

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&SpecSource> {
        self.0.get(field)
    }

    /// The tag as displayed to users, `UNKNOWN` when absent
    pub fn label(&self, field: &str) -> String {
        self.0
            .get(field)
            .map(|s| s.to_string())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, source: SpecSource) {
        self.0.insert(field.into(), source);
    }

    pub fn remove(&mut self, field: &str) -> Option<SpecSource> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecSource)> {
        self.0.iter()
    }
}

impl FromIterator<(String, SpecSource)> for SourceMap {
    fn from_iter<I: IntoIterator<Item = (String, SpecSource)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Tag every non-null provided field as user-contributed
///
/// `provided` holds the fields the caller explicitly supplied at creation time;
/// identity and structural fields listed in `excluded` are skipped.
pub fn annotate_sources(provided: &Map<String, Value>, excluded: &[&str]) -> SourceMap {
    provided
        .iter()
        .filter(|(field, value)| !value.is_null() && !excluded.contains(&field.as_str()))
        .map(|(field, _)| (field.clone(), SpecSource::UserContributed))
        .collect()
}

/// Annotate a freshly built record from its own non-null spec fields
pub fn annotate_record<T: SpecRecord>(record: &T) -> Result<SourceMap, EditError> {
    let fields = record_fields(record)?;
    let provided: Map<String, Value> = fields
        .into_iter()
        .filter(|(field, _)| T::SPEC_FIELDS.contains(&field.as_str()))
        .collect();
    Ok(annotate_sources(&provided, T::STRUCTURAL_FIELDS))
}

/// Errors from generic field edits
#[derive(Debug, Error)]
pub enum EditError {
    #[error("unknown field '{field}' (known spec fields: {known})")]
    UnknownField { field: String, known: String },

    #[error("field '{0}' is structural and cannot be edited this way")]
    StructuralField(String),

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("record could not be converted: {0}")]
    Conversion(#[from] serde_json::Error),
}

/// Serialize a record into its field map
pub(crate) fn record_fields<T: SpecRecord>(record: &T) -> Result<Map<String, Value>, EditError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

/// True when the field is absent or null in the serialized record
pub(crate) fn field_is_null(fields: &Map<String, Value>, field: &str) -> bool {
    fields.get(field).is_none_or(Value::is_null)
}

/// Parse a raw command-line value: JSON literal first, plain string otherwise
fn parse_raw_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Set one spec field from a raw string and mark it user-contributed
///
/// Any edit resets the field's tag to `user_contributed`; setting `null` clears
/// the value and drops its tag. The record is left untouched on error.
pub fn apply_user_edit<T: SpecRecord>(record: &mut T, field: &str, raw: &str) -> Result<(), EditError> {
    if T::STRUCTURAL_FIELDS.contains(&field) {
        return Err(EditError::StructuralField(field.to_string()));
    }
    if !T::SPEC_FIELDS.contains(&field) {
        return Err(EditError::UnknownField {
            field: field.to_string(),
            known: T::SPEC_FIELDS.join(", "),
        });
    }

    let value = parse_raw_value(raw);
    let mut fields = record_fields(record)?;
    let is_null = value.is_null();
    fields.insert(field.to_string(), value.clone());

    let mut updated: T = match serde_json::from_value(Value::Object(fields.clone())) {
        Ok(r) => r,
        Err(first) if !value.is_string() && !is_null => {
            // "500" parses as a number but may be meant for a text field
            fields.insert(field.to_string(), Value::String(raw.to_string()));
            serde_json::from_value(Value::Object(fields)).map_err(|_| EditError::InvalidValue {
                field: field.to_string(),
                value: raw.to_string(),
                reason: first.to_string(),
            })?
        }
        Err(e) => {
            return Err(EditError::InvalidValue {
                field: field.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            })
        }
    };

    if is_null {
        updated.sources_mut().remove(field);
    } else {
        updated
            .sources_mut()
            .insert(field, SpecSource::UserContributed);
    }
    *record = updated;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::engine::Engine;
    use serde_json::json;

    #[test]
    fn test_source_tag_roundtrip() {
        for tag in ["user_contributed", "manufacturer", "verified:carquery_api"] {
            let parsed: SpecSource = tag.parse().unwrap();
            assert_eq!(parsed.to_string(), tag);
        }
    }

    #[test]
    fn test_source_tag_rejects_unknown() {
        assert!("carquery_api".parse::<SpecSource>().is_err());
        assert!("verified:".parse::<SpecSource>().is_err());
        assert!(serde_yml::from_str::<SpecSource>("guess").is_err());
    }

    #[test]
    fn test_source_map_label_unknown() {
        let mut sources = SourceMap::new();
        sources.insert("weight_lbs", SpecSource::Manufacturer);
        assert_eq!(sources.label("weight_lbs"), "manufacturer");
        assert_eq!(sources.label("power_hp"), UNKNOWN_SOURCE);
    }

    #[test]
    fn test_annotate_sources_skips_null_and_excluded() {
        let provided = json!({
            "make": "Chevrolet",
            "model": "LS3",
            "power_hp": 430,
            "torque_lb_ft": 424,
            "compression_ratio": null,
            "notes": "from a magazine",
        });
        let provided = provided.as_object().unwrap();
        let sources = annotate_sources(provided, &["make", "model", "notes"]);

        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get("power_hp"), Some(&SpecSource::UserContributed));
        assert_eq!(sources.get("torque_lb_ft"), Some(&SpecSource::UserContributed));
        assert!(!sources.contains("compression_ratio"));
        assert!(!sources.contains("make"));
    }

    #[test]
    fn test_annotate_record_only_tags_spec_fields() {
        let mut engine = Engine::new("Chevrolet", "LS3");
        engine.power_hp = Some(430);
        engine.variant = Some("L99".to_string());

        let sources = annotate_record(&engine).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources.contains("power_hp"));
    }

    #[test]
    fn test_user_edit_resets_source() {
        let mut engine = Engine::new("Chevrolet", "LS3");
        engine.compression_ratio = Some(10.7);
        engine
            .sources
            .insert("compression_ratio", SpecSource::verified("carquery_api"));

        apply_user_edit(&mut engine, "compression_ratio", "11.2").unwrap();

        assert_eq!(engine.compression_ratio, Some(11.2));
        assert_eq!(
            engine.sources.get("compression_ratio"),
            Some(&SpecSource::UserContributed)
        );
    }

    #[test]
    fn test_user_edit_text_field_with_numeric_value() {
        let mut engine = Engine::new("Toyota", "2JZ-GTE");
        apply_user_edit(&mut engine, "can_bus_protocol", "500").unwrap();
        assert_eq!(engine.can_bus_protocol.as_deref(), Some("500"));
    }

    #[test]
    fn test_user_edit_null_clears_value_and_source() {
        let mut engine = Engine::new("Chevrolet", "LS3");
        apply_user_edit(&mut engine, "power_hp", "430").unwrap();
        apply_user_edit(&mut engine, "power_hp", "null").unwrap();
        assert_eq!(engine.power_hp, None);
        assert!(!engine.sources.contains("power_hp"));
    }

    #[test]
    fn test_user_edit_rejects_bad_fields() {
        let mut engine = Engine::new("Chevrolet", "LS3");
        assert!(matches!(
            apply_user_edit(&mut engine, "make", "Ford"),
            Err(EditError::StructuralField(_))
        ));
        assert!(matches!(
            apply_user_edit(&mut engine, "flux_capacitor", "1.21"),
            Err(EditError::UnknownField { .. })
        ));
        assert!(matches!(
            apply_user_edit(&mut engine, "power_hp", "lots"),
            Err(EditError::InvalidValue { .. })
        ));
        assert_eq!(engine.power_hp, None);
        assert!(engine.sources.is_empty());
    }
}
