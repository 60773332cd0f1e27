//! File-backed record store
//!
//! Each record is one YAML file named `<ID>.swap.yaml` in its kind's
//! directory. IDs may be abbreviated to any unique prefix when loading.

use miette::Diagnostic;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::project::{Project, RECORD_SUFFIX};
use crate::entities::{Build, Engine, Transmission, Vehicle};
use crate::yaml::{parse_yaml_file, YamlError};

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("no {kind} found matching '{query}'")]
    #[diagnostic(
        code(swapspec::store::not_found),
        help("List the records of this kind to see available IDs")
    )]
    EntityNotFound { kind: &'static str, query: String },

    #[error("{kind} {id} is referenced but does not exist")]
    #[diagnostic(
        code(swapspec::store::missing_reference),
        help("Create the {kind} first, or check the ID for typos")
    )]
    MissingReference { kind: &'static str, id: String },

    #[error("'{query}' matches {} {kind} records: {}", matches.len(), matches.join(", "))]
    #[diagnostic(
        code(swapspec::store::ambiguous),
        help("Use more characters of the ID")
    )]
    Ambiguous {
        kind: &'static str,
        query: String,
        matches: Vec<String>,
    },

    #[error("I/O error: {0}")]
    #[diagnostic(code(swapspec::store::io))]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    #[diagnostic(code(swapspec::store::serialize))]
    Serialize(#[from] serde_yml::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] YamlError),
}

/// A build together with the records it references
#[derive(Debug, Clone)]
pub struct BuildBundle {
    pub build: Build,
    pub engine: Engine,
    pub vehicle: Vehicle,
    pub transmission: Option<Transmission>,
}

impl Project {
    /// Path a record with this ID is stored at
    pub fn record_path(&self, id: &EntityId) -> PathBuf {
        self.record_dir(id.prefix())
            .join(format!("{}{}", id, RECORD_SUFFIX))
    }

    /// Write a record to its file, replacing any previous version
    pub fn save<T: Entity>(&self, record: &T) -> Result<PathBuf, StoreError> {
        let dir = self.record_dir(T::PREFIX);
        fs::create_dir_all(&dir)?;

        let path = self.record_path(record.id());
        let yaml = serde_yml::to_string(record)?;
        fs::write(&path, yaml)?;

        tracing::debug!(id = %record.id(), path = %path.display(), "saved record");
        Ok(path)
    }

    /// All record files of one kind, sorted by file name
    fn record_files(&self, prefix: EntityPrefix) -> Vec<PathBuf> {
        let dir = self.record_dir(prefix);
        if !dir.is_dir() {
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(RECORD_SUFFIX))
            })
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }

    /// Resolve a full or abbreviated ID to the record's file
    pub fn resolve<T: Entity>(&self, query: &str) -> Result<PathBuf, StoreError> {
        let kind = T::PREFIX.kind_name();
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return Err(StoreError::EntityNotFound {
                kind,
                query: query.to_string(),
            });
        }

        let matches: Vec<PathBuf> = self
            .record_files(T::PREFIX)
            .into_iter()
            .filter(|path| {
                record_stem(path).is_some_and(|stem| stem.to_uppercase().starts_with(&needle))
            })
            .collect();

        // An exact match wins even when it is also a prefix of another ID
        if let Some(exact) = matches
            .iter()
            .find(|p| record_stem(p).is_some_and(|s| s.eq_ignore_ascii_case(&needle)))
        {
            return Ok(exact.clone());
        }

        let mut matches = matches;
        match matches.len() {
            0 => Err(StoreError::EntityNotFound {
                kind,
                query: query.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(StoreError::Ambiguous {
                kind,
                query: query.to_string(),
                matches: matches
                    .iter()
                    .filter_map(|p| record_stem(p).map(str::to_string))
                    .collect(),
            }),
        }
    }

    /// Load a record by full or abbreviated ID
    pub fn load<T: Entity>(&self, query: &str) -> Result<(T, PathBuf), StoreError> {
        let path = self.resolve::<T>(query)?;
        let record = parse_yaml_file(&path)?;
        tracing::debug!(path = %path.display(), "loaded record");
        Ok((record, path))
    }

    /// Load a record by exact ID, `None` when no file exists
    pub fn find<T: Entity>(&self, id: &EntityId) -> Result<Option<T>, StoreError> {
        let path = self.record_path(id);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(parse_yaml_file(&path)?))
    }

    /// Every record of one kind, oldest first
    pub fn list<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        let mut records = self
            .record_files(T::PREFIX)
            .iter()
            .map(|path| parse_yaml_file::<T>(path).map_err(StoreError::from))
            .collect::<Result<Vec<T>, _>>()?;
        records.sort_by_key(|r| r.created());
        Ok(records)
    }

    /// Load one referenced record or report it as missing
    fn require<T: Entity>(&self, id: &EntityId) -> Result<T, StoreError> {
        let missing = || StoreError::MissingReference {
            kind: T::PREFIX.kind_name(),
            id: id.to_string(),
        };
        if id.prefix() != T::PREFIX {
            return Err(missing());
        }
        self.find(id)?.ok_or_else(missing)
    }

    /// Check that every record a build references exists
    pub fn check_references(&self, build: &Build) -> Result<(), StoreError> {
        self.require::<Vehicle>(&build.vehicle)?;
        self.require::<Engine>(&build.engine)?;
        if let Some(trans) = &build.transmission {
            self.require::<Transmission>(trans)?;
        }
        Ok(())
    }

    /// Load a build with its vehicle, engine and optional transmission
    pub fn load_bundle(&self, query: &str) -> Result<BuildBundle, StoreError> {
        let (build, _) = self.load::<Build>(query)?;
        let vehicle = self.require::<Vehicle>(&build.vehicle)?;
        let engine = self.require::<Engine>(&build.engine)?;
        let transmission = build
            .transmission
            .as_ref()
            .map(|id| self.require::<Transmission>(id))
            .transpose()?;

        Ok(BuildBundle {
            build,
            engine,
            vehicle,
            transmission,
        })
    }
}

/// File name without the record suffix
fn record_stem(path: &std::path::Path) -> Option<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(RECORD_SUFFIX))
}
