//! Spec enrichment - filling empty spec fields from a lookup provider
//!
//! Enrichment never overwrites: a field is filled only when it is null on the
//! record and has no recorded source. Filled fields are tagged with the
//! provider's source (`verified:<provider>` or `manufacturer`), never
//! `user_contributed`. When the provider fails the record is left untouched
//! and the caller gets [`EnrichOutcome::Skipped`] with the reason.

pub mod catalog;

pub use catalog::{Catalog, CatalogEntry, CatalogProvider};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::entity::SpecRecord;
use crate::core::identity::EntityPrefix;
use crate::core::provenance::{field_is_null, record_fields, SpecSource};
use crate::yaml::YamlError;

/// What to look specs up for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecQuery {
    pub kind: EntityPrefix,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub trim: Option<String>,
}

impl SpecQuery {
    /// Build the query a record would be enriched with
    pub fn for_record<T: SpecRecord>(record: &T) -> Self {
        Self {
            kind: T::PREFIX,
            make: record.make().to_string(),
            model: record.model().to_string(),
            year: record.year_hint(),
            trim: record.trim_hint().map(str::to_string),
        }
    }
}

/// How much of a record a lookup could answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Three or more fields is high, any fewer is medium, none is low
    pub fn from_field_count(count: usize) -> Self {
        match count {
            0 => Confidence::Low,
            1 | 2 => Confidence::Medium,
            _ => Confidence::High,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Specs returned by a provider, with the source of each value
#[derive(Debug, Clone, PartialEq)]
pub struct SpecLookup {
    pub specs: BTreeMap<String, Value>,
    pub sources: BTreeMap<String, SpecSource>,
    pub confidence: Confidence,
}

impl SpecLookup {
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
            sources: BTreeMap::new(),
            confidence: Confidence::Low,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("spec catalog not found at {0}")]
    CatalogMissing(PathBuf),

    #[error("spec catalog is invalid: {0}")]
    Catalog(#[from] YamlError),

    #[error("{provider} lookup failed: {reason}")]
    Lookup { provider: String, reason: String },
}

/// A source of reference specs
pub trait SpecProvider {
    /// Provider name, used in `verified:<name>` tags
    fn name(&self) -> &str;

    fn lookup(&self, query: &SpecQuery) -> Result<SpecLookup, ProviderError>;
}

/// Why an enrichment changed nothing
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The provider had no specs for this make/model
    NoMatch,
    /// Every spec the provider knows is already set on the record
    NothingToFill,
    /// The provider could not be queried
    ProviderFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoMatch => write!(f, "no reference specs found"),
            SkipReason::NothingToFill => write!(f, "all known specs are already set"),
            SkipReason::ProviderFailed(reason) => write!(f, "lookup failed: {}", reason),
        }
    }
}

/// Result of one enrichment attempt
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichOutcome {
    Enriched {
        provider: String,
        /// Filled fields, in field-name order
        fields: Vec<String>,
        confidence: Confidence,
    },
    Skipped(SkipReason),
}

impl EnrichOutcome {
    pub fn filled(&self) -> &[String] {
        match self {
            EnrichOutcome::Enriched { fields, .. } => fields,
            EnrichOutcome::Skipped(_) => &[],
        }
    }
}

/// Fill a record's empty spec fields from a provider
pub fn enrich<T: SpecRecord>(record: &mut T, provider: &dyn SpecProvider) -> EnrichOutcome {
    let query = SpecQuery::for_record(record);
    let lookup = match provider.lookup(&query) {
        Ok(lookup) => lookup,
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "enrichment skipped");
            return EnrichOutcome::Skipped(SkipReason::ProviderFailed(e.to_string()));
        }
    };

    if lookup.is_empty() {
        tracing::info!(id = %record.id(), provider = provider.name(), "no reference specs");
        return EnrichOutcome::Skipped(SkipReason::NoMatch);
    }

    let mut fields: Map<String, Value> = match record_fields(record) {
        Ok(fields) => fields,
        Err(e) => return EnrichOutcome::Skipped(SkipReason::ProviderFailed(e.to_string())),
    };

    let mut filled: Vec<(String, SpecSource)> = Vec::new();
    for (field, value) in &lookup.specs {
        if value.is_null()
            || !T::SPEC_FIELDS.contains(&field.as_str())
            || !field_is_null(&fields, field)
            || record.sources().contains(field)
        {
            continue;
        }

        // Keep only values the record type accepts
        let mut candidate = fields.clone();
        candidate.insert(field.clone(), value.clone());
        if let Err(e) = serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            tracing::warn!(field = %field, error = %e, "ignoring reference value of the wrong type");
            continue;
        }
        fields = candidate;

        // Providers never vouch for user-contributed data
        let source = lookup
            .sources
            .get(field)
            .filter(|s| !s.is_user_contributed())
            .cloned()
            .unwrap_or_else(|| SpecSource::verified(provider.name()));
        filled.push((field.clone(), source));
    }

    if filled.is_empty() {
        return EnrichOutcome::Skipped(SkipReason::NothingToFill);
    }

    let mut updated: T = match serde_json::from_value(Value::Object(fields)) {
        Ok(updated) => updated,
        Err(e) => return EnrichOutcome::Skipped(SkipReason::ProviderFailed(e.to_string())),
    };
    for (field, source) in &filled {
        updated.sources_mut().insert(field.clone(), source.clone());
    }
    *record = updated;

    let fields: Vec<String> = filled.into_iter().map(|(field, _)| field).collect();
    tracing::info!(
        id = %record.id(),
        provider = provider.name(),
        count = fields.len(),
        "enriched record"
    );
    EnrichOutcome::Enriched {
        provider: provider.name().to_string(),
        fields,
        confidence: lookup.confidence,
    }
}
