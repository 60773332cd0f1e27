//! Project discovery and layout
//!
//! A SwapSpec project is any directory containing a `.swapspec/` folder.
//! Records live in plain YAML files underneath it, one file per record.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::EntityPrefix;

/// Name of the marker directory
pub const PROJECT_DIR: &str = ".swapspec";

/// Suffix of every record file
pub const RECORD_SUFFIX: &str = ".swap.yaml";

const DEFAULT_CONFIG: &str = "\
# SwapSpec project settings
# author: your-name
auto_enrich: true
catalog: .swapspec/catalog.yaml
";

const DEFAULT_CATALOG: &str = "\
# Reference specs used by `swapspec <kind> enrich`.
# Each entry fills only fields that are still empty on the record.
#
# provider: local_catalog
# engines:
#   - make: Chevrolet
#     model: LS3
#     source: manufacturer
#     specs:
#       displacement_liters: 6.2
#       compression_ratio: 10.7
provider: local_catalog
engines: []
vehicles: []
transmissions: []
";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not inside a SwapSpec project (no {PROJECT_DIR}/ found); run `swapspec init` first")]
    NotFound,

    #[error("a SwapSpec project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A SwapSpec project rooted at a directory
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find the project containing the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Find the project containing `start`, walking up through parents
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(|dir| Self {
                root: dir.to_path_buf(),
            })
            .ok_or(ProjectError::NotFound)
    }

    /// Create a new project at `root`
    pub fn init(root: &Path) -> Result<Self, ProjectError> {
        let marker = root.join(PROJECT_DIR);
        if marker.exists() {
            return Err(ProjectError::AlreadyExists(root.to_path_buf()));
        }

        fs::create_dir_all(&marker)?;
        fs::write(marker.join("config.yaml"), DEFAULT_CONFIG)?;
        fs::write(marker.join("catalog.yaml"), DEFAULT_CATALOG)?;
        for prefix in EntityPrefix::all() {
            fs::create_dir_all(root.join(prefix.directory()))?;
        }

        tracing::info!(root = %root.display(), "initialized project");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.swapspec/` directory
    pub fn swapspec_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Directory holding records of the given kind
    pub fn record_dir(&self, prefix: EntityPrefix) -> PathBuf {
        self.root.join(prefix.directory())
    }
}
