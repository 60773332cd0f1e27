//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Helper to get a swapspec command with a stable environment
pub fn swapspec() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("swapspec"));
    cmd.env("SWAPSPEC_AUTHOR", "tester")
        .env_remove("SWAPSPEC_CATALOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    swapspec().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Replace the project's spec catalog
pub fn write_catalog(tmp: &TempDir, content: &str) {
    fs::write(tmp.path().join(".swapspec/catalog.yaml"), content).unwrap();
}

/// Run a `new` command with `-f id` and return the created ID
pub fn create_with(tmp: &TempDir, args: &[&str]) -> String {
    let output = swapspec()
        .current_dir(tmp.path())
        .args(["-f", "id"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to create an engine with only make and model
pub fn create_engine(tmp: &TempDir, make: &str, model: &str) -> String {
    create_with(
        tmp,
        &["engine", "new", "--make", make, "--model", model, "--no-enrich"],
    )
}

/// Helper to create a vehicle
pub fn create_vehicle(tmp: &TempDir, year: &str, make: &str, model: &str) -> String {
    create_with(
        tmp,
        &[
            "vehicle",
            "new",
            "--year",
            year,
            "--make",
            make,
            "--model",
            model,
            "--no-enrich",
        ],
    )
}

/// Helper to create a transmission
pub fn create_trans(tmp: &TempDir, make: &str, model: &str, max_torque: &str) -> String {
    create_with(
        tmp,
        &[
            "trans",
            "new",
            "--make",
            make,
            "--model",
            model,
            "--max-torque",
            max_torque,
            "--no-enrich",
        ],
    )
}

/// Helper to create a build from existing record IDs
pub fn create_build(tmp: &TempDir, vehicle: &str, engine: &str) -> String {
    create_with(
        tmp,
        &["build", "new", "--vehicle", vehicle, "--engine", engine],
    )
}
