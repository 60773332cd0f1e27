//! Core module - fundamental types and utilities

pub mod config;
pub mod entity;
pub mod identity;
pub mod logging;
pub mod project;
pub mod provenance;
pub mod store;

pub use config::Config;
pub use entity::{Entity, SpecRecord};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use project::{Project, ProjectError};
pub use provenance::{annotate_sources, apply_user_edit, EditError, SourceMap, SpecSource};
pub use store::{BuildBundle, StoreError};
