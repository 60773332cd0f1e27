//! Command implementations

pub mod build;
pub mod completions;
pub mod engine;
pub mod init;
pub mod trans;
pub mod vehicle;
