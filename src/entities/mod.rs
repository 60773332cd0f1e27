//! Entity type definitions

pub mod build;
pub mod engine;
pub mod transmission;
pub mod vehicle;

pub use build::{Build, BuildStatus};
pub use engine::Engine;
pub use transmission::Transmission;
pub use vehicle::{QualityStatus, Vehicle};
