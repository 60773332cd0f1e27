//! Local YAML spec catalog
//!
//! ```yaml
//! provider: local_catalog
//! engines:
//!   - make: Chevrolet
//!     model: LS3
//!     year: 2008          # optional, matches only that model year
//!     trim: L99           # optional, matches that trim or one word of it ("2008 L99")
//!     source: manufacturer
//!     specs:
//!       displacement_liters: 6.2
//!       compression_ratio: 10.7
//! vehicles: []
//! transmissions: []
//! ```
//!
//! Entries without `source` are tagged `verified:<provider>`. When several
//! entries match, the most specific one (year and trim) wins per field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::identity::EntityPrefix;
use crate::core::provenance::SpecSource;
use crate::enrich::{Confidence, ProviderError, SpecLookup, SpecProvider, SpecQuery};
use crate::yaml::{parse_yaml, parse_yaml_file};

/// Provider name used when the catalog does not set one
pub const DEFAULT_PROVIDER: &str = "local_catalog";

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

/// One reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub make: String,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,

    /// Tag for every value in this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SpecSource>,

    #[serde(default)]
    pub specs: BTreeMap<String, Value>,
}

impl CatalogEntry {
    /// Whether this entry describes the queried record
    pub fn matches(&self, query: &SpecQuery) -> bool {
        if !same_name(&self.make, &query.make) || !same_name(&self.model, &query.model) {
            return false;
        }
        if self.year.is_some() && self.year != query.year {
            return false;
        }
        match (&self.trim, &query.trim) {
            (Some(want), Some(have)) => trim_matches(want, have),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    fn specificity(&self) -> u8 {
        u8::from(self.year.is_some()) + u8::from(self.trim.is_some())
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// An entry trim matches the whole record trim or one word of it,
/// so `L99` matches an engine variant of `2008 L99`
fn trim_matches(entry: &str, record: &str) -> bool {
    same_name(entry, record)
        || record
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| same_name(entry, word))
}

/// Catalog file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub engines: Vec<CatalogEntry>,

    #[serde(default)]
    pub vehicles: Vec<CatalogEntry>,

    #[serde(default)]
    pub transmissions: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            engines: Vec::new(),
            vehicles: Vec::new(),
            transmissions: Vec::new(),
        }
    }
}

impl Catalog {
    fn entries(&self, kind: EntityPrefix) -> &[CatalogEntry] {
        match kind {
            EntityPrefix::Eng => &self.engines,
            EntityPrefix::Veh => &self.vehicles,
            EntityPrefix::Trn => &self.transmissions,
            EntityPrefix::Bld => &[],
        }
    }
}

/// Spec provider backed by a [`Catalog`]
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    catalog: Catalog,
}

impl CatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Load the catalog file at `path`
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        if !path.is_file() {
            return Err(ProviderError::CatalogMissing(path.to_path_buf()));
        }
        let catalog: Catalog = parse_yaml_file(path)?;
        tracing::debug!(
            path = %path.display(),
            engines = catalog.engines.len(),
            vehicles = catalog.vehicles.len(),
            transmissions = catalog.transmissions.len(),
            "loaded spec catalog"
        );
        Ok(Self::new(catalog))
    }

    /// Parse a catalog from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ProviderError> {
        Ok(Self::new(parse_yaml(content, "catalog.yaml")?))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl SpecProvider for CatalogProvider {
    fn name(&self) -> &str {
        &self.catalog.provider
    }

    fn lookup(&self, query: &SpecQuery) -> Result<SpecLookup, ProviderError> {
        let mut matching: Vec<&CatalogEntry> = self
            .catalog
            .entries(query.kind)
            .iter()
            .filter(|entry| entry.matches(query))
            .collect();
        // Stable sort keeps file order among equally specific entries
        matching.sort_by_key(|entry| std::cmp::Reverse(entry.specificity()));

        let mut lookup = SpecLookup::empty();
        for entry in matching {
            let source = entry
                .source
                .clone()
                .unwrap_or_else(|| SpecSource::verified(self.name()));
            for (field, value) in &entry.specs {
                if value.is_null() || lookup.specs.contains_key(field) {
                    continue;
                }
                lookup.specs.insert(field.clone(), value.clone());
                lookup.sources.insert(field.clone(), source.clone());
            }
        }
        lookup.confidence = Confidence::from_field_count(lookup.specs.len());
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{enrich, EnrichOutcome};
    use crate::entities::{Engine, Transmission};
    use tempfile::TempDir;

    const CATALOG: &str = r#"
provider: test_catalog
engines:
  - make: Chevrolet
    model: LS3
    specs:
      displacement_liters: 6.2
      compression_ratio: 10.7
      valve_train: OHV
  - make: chevrolet
    model: ls3
    year: 2008
    source: manufacturer
    specs:
      compression_ratio: 10.4
transmissions:
  - make: Tremec
    model: T56 Magnum
    specs:
      max_torque_capacity_lb_ft: 700
"#;

    fn query(make: &str, model: &str, year: Option<i32>) -> SpecQuery {
        SpecQuery {
            kind: EntityPrefix::Eng,
            make: make.to_string(),
            model: model.to_string(),
            year,
            trim: None,
        }
    }

    #[test]
    fn test_lookup_matches_case_insensitively() {
        let provider = CatalogProvider::from_yaml(CATALOG).unwrap();
        let lookup = provider.lookup(&query("CHEVROLET", " ls3 ", None)).unwrap();

        assert_eq!(lookup.specs.len(), 3);
        assert_eq!(lookup.confidence, Confidence::High);
        assert_eq!(
            lookup.sources.get("valve_train"),
            Some(&SpecSource::verified("test_catalog"))
        );
    }

    #[test]
    fn test_more_specific_entry_wins() {
        let provider = CatalogProvider::from_yaml(CATALOG).unwrap();
        let lookup = provider
            .lookup(&query("Chevrolet", "LS3", Some(2008)))
            .unwrap();

        assert_eq!(
            lookup.specs.get("compression_ratio"),
            Some(&serde_json::json!(10.4))
        );
        assert_eq!(
            lookup.sources.get("compression_ratio"),
            Some(&SpecSource::Manufacturer)
        );
        assert_eq!(
            lookup.sources.get("displacement_liters"),
            Some(&SpecSource::verified("test_catalog"))
        );
    }

    #[test]
    fn test_lookup_is_scoped_by_kind() {
        let provider = CatalogProvider::from_yaml(CATALOG).unwrap();
        let mut q = query("Tremec", "T56 Magnum", None);
        assert!(provider.lookup(&q).unwrap().is_empty());

        q.kind = EntityPrefix::Trn;
        assert_eq!(provider.lookup(&q).unwrap().specs.len(), 1);
    }

    #[test]
    fn test_enrich_from_catalog() {
        let provider = CatalogProvider::from_yaml(CATALOG).unwrap();
        let mut trans = Transmission::new("Tremec", "T56 Magnum");

        let outcome = enrich(&mut trans, &provider);
        assert!(matches!(outcome, EnrichOutcome::Enriched { .. }));
        assert_eq!(trans.max_torque_capacity_lb_ft, Some(700));
        assert_eq!(
            trans.sources.label("max_torque_capacity_lb_ft"),
            "verified:test_catalog"
        );
    }

    #[test]
    fn test_load_missing_catalog() {
        let tmp = TempDir::new().unwrap();
        let err = CatalogProvider::load(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ProviderError::CatalogMissing(_)));
    }

    #[test]
    fn test_invalid_source_tag_rejected() {
        let yaml = "engines:\n  - make: Ford\n    model: Coyote\n    source: forum_post\n";
        assert!(matches!(
            CatalogProvider::from_yaml(yaml),
            Err(ProviderError::Catalog(_))
        ));
    }

    #[test]
    fn test_year_and_trim_entry_matches_engine_variant() {
        let yaml = r#"
provider: gm_reference
engines:
  - make: Chevrolet
    model: LS3
    year: 2008
    trim: L99
    source: manufacturer
    specs:
      displacement_liters: 6.2
      compression_ratio: 10.4
"#;
        let provider = CatalogProvider::from_yaml(yaml).unwrap();

        let mut engine = Engine::new("Chevrolet", "LS3");
        engine.variant = Some("2008 L99".to_string());
        let outcome = enrich(&mut engine, &provider);

        assert!(matches!(outcome, EnrichOutcome::Enriched { .. }));
        assert_eq!(engine.compression_ratio, Some(10.4));
        assert_eq!(engine.sources.label("compression_ratio"), "manufacturer");

        // Year without the trim, or the trim in another year, does not match
        for variant in ["2008", "2010 L99", "L99"] {
            let mut other = Engine::new("Chevrolet", "LS3");
            other.variant = Some(variant.to_string());
            assert!(
                matches!(enrich(&mut other, &provider), EnrichOutcome::Skipped(_)),
                "variant {variant}"
            );
        }
    }

    #[test]
    fn test_trim_matches_whole_or_word() {
        assert!(trim_matches("L99", "l99"));
        assert!(trim_matches("L99", "2008 L99"));
        assert!(trim_matches("SS", "SS/RS"));
        assert!(trim_matches("Z28 RS", "z28 rs"));
        assert!(!trim_matches("L9", "2008 L99"));
        assert!(!trim_matches("Z28 RS", "Z28"));
    }

    #[test]
    fn test_default_provider_name() {
        let provider = CatalogProvider::from_yaml("engines: []\n").unwrap();
        assert_eq!(provider.name(), DEFAULT_PROVIDER);

        let mut engine = Engine::new("Chevrolet", "LS3");
        assert!(matches!(
            enrich(&mut engine, &provider),
            EnrichOutcome::Skipped(_)
        ));
    }
}
