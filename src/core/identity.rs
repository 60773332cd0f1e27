//! Entity identity - prefixed ULID identifiers
//!
//! Every record carries an ID of the form `ENG-01J...`, where the prefix names
//! the record kind and the suffix is a 26-character ULID.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

/// Record kind prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityPrefix {
    /// Engine spec record
    Eng,
    /// Vehicle spec record
    Veh,
    /// Transmission spec record
    Trn,
    /// Swap build project
    Bld,
}

impl EntityPrefix {
    /// All known prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Eng,
            EntityPrefix::Veh,
            EntityPrefix::Trn,
            EntityPrefix::Bld,
        ]
    }

    /// The prefix as it appears in IDs
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Eng => "ENG",
            EntityPrefix::Veh => "VEH",
            EntityPrefix::Trn => "TRN",
            EntityPrefix::Bld => "BLD",
        }
    }

    /// Human-readable record kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            EntityPrefix::Eng => "engine",
            EntityPrefix::Veh => "vehicle",
            EntityPrefix::Trn => "transmission",
            EntityPrefix::Bld => "build",
        }
    }

    /// Directory (relative to the project root) holding records of this kind
    pub fn directory(&self) -> &'static str {
        match self {
            EntityPrefix::Eng => "specs/engines",
            EntityPrefix::Veh => "specs/vehicles",
            EntityPrefix::Trn => "specs/transmissions",
            EntityPrefix::Bld => "builds",
        }
    }

    /// Detect the prefix from a record filename like `ENG-01J....swap.yaml`
    pub fn from_filename(filename: &str) -> Option<EntityPrefix> {
        let head = filename.split('-').next()?;
        head.parse().ok()
    }
}

impl std::fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ENG" => Ok(EntityPrefix::Eng),
            "VEH" => Ok(EntityPrefix::Veh),
            "TRN" => Ok(EntityPrefix::Trn),
            "BLD" => Ok(EntityPrefix::Bld),
            _ => Err(IdParseError::UnknownPrefix(s.to_string())),
        }
    }
}

/// Errors raised while parsing an entity ID
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("missing '-' separator in ID '{0}'")]
    MissingSeparator(String),

    #[error("unknown entity prefix '{0}' (expected ENG, VEH, TRN or BLD)")]
    UnknownPrefix(String),

    #[error("invalid ULID '{0}'")]
    InvalidUlid(String),
}

/// A prefixed, globally unique entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Generate a fresh ID for the given record kind
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    /// Parse an ID string such as `ENG-01HQ5V2KRMJ0B9XYZ3NTWPGQ4E`
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let (prefix, rest) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let prefix: EntityPrefix = prefix.parse()?;
        let ulid = Ulid::from_string(rest).map_err(|_| IdParseError::InvalidUlid(rest.to_string()))?;
        Ok(Self { prefix, ulid })
    }

    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl std::str::FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EntityId::parse(&s).map_err(serde::de::Error::custom)
    }
}
