//! SwapSpec: engine swap planning and fitment checks
//!
//! Engines, vehicles, transmissions and builds are plain YAML records in a
//! project directory. Every spec value carries a provenance tag, and
//! [`fitment::evaluate_fitment`] turns a build's records into an ordered list
//! of compatibility advisories.

pub mod cli;
pub mod context;
pub mod core;
pub mod enrich;
pub mod entities;
pub mod export;
pub mod fitment;
pub mod yaml;

pub use fitment::{evaluate_advisories, evaluate_fitment, Advisory, FitmentInput, Severity};
