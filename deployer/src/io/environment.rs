//! Deployed environment and module handles.
//!
//! An environment is a filesystem-resident instance of a code branch whose
//! `modules/` directory holds the resolved modules. Module enumeration is
//! lazy and may fail wholesale; per-module revision lookup is a capability
//! only source-control backed modules offer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::io::git::{Git, RevisionSource};

/// Externally-owned handle to a deployed code environment.
pub trait Environment {
    /// Root directory of the deployed environment.
    fn path(&self) -> &Path;

    /// Caller-supplied metadata preserved verbatim into the deploy record.
    fn info(&self) -> &Map<String, Value>;

    /// Resolve the environment's modules. Resolution itself may fail.
    fn modules(&self) -> Result<Vec<Box<dyn DeployedModule>>>;
}

/// A named, versioned unit of code pulled into an environment.
pub trait DeployedModule {
    fn name(&self) -> &str;

    fn version(&self) -> Option<String>;

    /// Revision lookup capability, when the module is source-control backed.
    ///
    /// Callers must treat "no capability" and "capability errored" the same
    /// way: neither produces a SHA.
    fn repo(&self) -> Option<&dyn RevisionSource>;
}

/// Environment rooted at a directory, with modules under `<root>/modules/`.
#[derive(Debug, Clone)]
pub struct CodeEnvironment {
    path: PathBuf,
    info: Map<String, Value>,
}

impl CodeEnvironment {
    pub fn new(path: impl Into<PathBuf>, info: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            info,
        }
    }
}

impl Environment for CodeEnvironment {
    fn path(&self) -> &Path {
        &self.path
    }

    fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    /// Scan `modules/` for deployed modules, in lexicographic name order.
    ///
    /// A subdirectory with a `.git` entry is git-backed; anything else is
    /// treated as a forge module. Version comes from an optional
    /// `metadata.json`. Non-directory entries are skipped.
    fn modules(&self) -> Result<Vec<Box<dyn DeployedModule>>> {
        let modules_dir = self.path.join("modules");
        let entries = fs::read_dir(&modules_dir)
            .with_context(|| format!("read modules dir {}", modules_dir.display()))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("read entry in {}", modules_dir.display()))?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        // read_dir order is platform-dependent; sort so records are stable.
        dirs.sort();

        let mut modules: Vec<Box<dyn DeployedModule>> = Vec::new();
        for dir in dirs {
            let name = dir
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let version = read_metadata_version(&dir);
            if dir.join(".git").exists() {
                modules.push(Box::new(GitModule {
                    name,
                    version,
                    repo: Git::new(&dir),
                }));
            } else {
                modules.push(Box::new(ForgeModule { name, version }));
            }
        }
        Ok(modules)
    }
}

/// Module backed by a git repository.
#[derive(Debug, Clone)]
pub struct GitModule {
    pub name: String,
    pub version: Option<String>,
    pub repo: Git,
}

impl DeployedModule for GitModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn repo(&self) -> Option<&dyn RevisionSource> {
        Some(&self.repo)
    }
}

/// Module installed from a forge release; no backing repository.
#[derive(Debug, Clone)]
pub struct ForgeModule {
    pub name: String,
    pub version: Option<String>,
}

impl DeployedModule for ForgeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn repo(&self) -> Option<&dyn RevisionSource> {
        None
    }
}

#[derive(Deserialize)]
struct ModuleMetadata {
    version: Option<String>,
}

/// Version from the module's `metadata.json`, when present and parseable.
fn read_metadata_version(dir: &Path) -> Option<String> {
    let contents = fs::read_to_string(dir.join("metadata.json")).ok()?;
    let metadata: ModuleMetadata = serde_json::from_str(&contents).ok()?;
    metadata.version
}
