//! Layered configuration
//!
//! Later layers override earlier ones:
//! 1. built-in defaults
//! 2. user config (`~/.config/swapspec/config.yaml` on Linux)
//! 3. project config (`.swapspec/config.yaml`)
//! 4. environment (`SWAPSPEC_AUTHOR`, `SWAPSPEC_CATALOG`)

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::project::Project;

/// Default catalog location, relative to the project root
pub const DEFAULT_CATALOG: &str = ".swapspec/catalog.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded as the owner of new builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Enrich new spec records from the catalog on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_enrich: Option<bool>,

    /// Spec catalog path, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Output format used when `--format` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load every layer for the given project (or only global layers outside one)
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        if let Some(dirs) = ProjectDirs::from("", "", "swapspec") {
            let user_file = dirs.config_dir().join("config.yaml");
            if let Some(layer) = Self::from_file(&user_file) {
                config.merge(layer);
            }
        }

        if let Some(project) = project {
            let project_file = project.swapspec_dir().join("config.yaml");
            if let Some(layer) = Self::from_file(&project_file) {
                config.merge(layer);
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read one layer; unreadable or malformed files are skipped with a warning
    pub fn from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config layer");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Overlay values set in `other`
    pub fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.auto_enrich.is_some() {
            self.auto_enrich = other.auto_enrich;
        }
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(author) = lookup("SWAPSPEC_AUTHOR").filter(|s| !s.trim().is_empty()) {
            self.author = Some(author);
        }
        if let Some(catalog) = lookup("SWAPSPEC_CATALOG").filter(|s| !s.trim().is_empty()) {
            self.catalog = Some(PathBuf::from(catalog));
        }
    }

    /// Author name, falling back to the login name
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn auto_enrich(&self) -> bool {
        self.auto_enrich.unwrap_or(true)
    }

    /// Absolute catalog path for a project
    pub fn catalog_path(&self, project: &Project) -> PathBuf {
        let catalog = self
            .catalog
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG));
        if catalog.is_absolute() {
            catalog
        } else {
            project.root().join(catalog)
        }
    }
}
