//! Test-only helpers: scripted environments/modules and git fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value, json};

use crate::io::environment::{DeployedModule, Environment};
use crate::io::git::RevisionSource;

/// Scripted revision source: a fixed SHA, or a lookup that always fails.
#[derive(Debug, Clone)]
pub struct FakeRepo {
    head: Option<String>,
}

impl RevisionSource for FakeRepo {
    fn head(&self) -> Result<String> {
        self.head
            .clone()
            .ok_or_else(|| anyhow!("scripted head failure"))
    }
}

/// Module handle with scripted metadata and revision behavior.
#[derive(Debug, Clone)]
pub struct FakeModule {
    name: String,
    version: Option<String>,
    repo: Option<FakeRepo>,
}

impl FakeModule {
    /// Git-backed module whose revision lookup yields `sha`.
    pub fn git(name: &str, version: &str, sha: &str) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.to_string()),
            repo: Some(FakeRepo {
                head: Some(sha.to_string()),
            }),
        }
    }

    /// Forge-style module with no revision capability.
    pub fn forge(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.to_string()),
            repo: None,
        }
    }

    /// Git-backed module whose revision lookup errors.
    pub fn with_failing_repo(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: Some(version.to_string()),
            repo: Some(FakeRepo { head: None }),
        }
    }
}

impl DeployedModule for FakeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn repo(&self) -> Option<&dyn RevisionSource> {
        self.repo.as_ref().map(|repo| repo as &dyn RevisionSource)
    }
}

/// Environment whose module enumeration is scripted.
pub struct FakeEnvironment {
    path: PathBuf,
    info: Map<String, Value>,
    modules: Option<Vec<FakeModule>>,
}

impl FakeEnvironment {
    pub fn new(path: impl Into<PathBuf>, info: Map<String, Value>, modules: Vec<FakeModule>) -> Self {
        Self {
            path: path.into(),
            info,
            modules: Some(modules),
        }
    }

    /// Environment whose module enumeration always fails.
    pub fn failing(path: impl Into<PathBuf>, info: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            info,
            modules: None,
        }
    }
}

impl Environment for FakeEnvironment {
    fn path(&self) -> &Path {
        &self.path
    }

    fn info(&self) -> &Map<String, Value> {
        &self.info
    }

    fn modules(&self) -> Result<Vec<Box<dyn DeployedModule>>> {
        match &self.modules {
            Some(modules) => Ok(modules
                .iter()
                .cloned()
                .map(|module| Box::new(module) as Box<dyn DeployedModule>)
                .collect()),
            None => Err(anyhow!("scripted module enumeration failure")),
        }
    }
}

/// Temporary git repository with one seed commit.
pub struct TestRepo {
    root: PathBuf,
    _temp: Option<tempfile::TempDir>,
}

impl TestRepo {
    /// Repository in its own temporary directory.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let root = temp.path().to_path_buf();
        Self::init(root, Some(temp))
    }

    /// Repository at a caller-chosen path (created if missing).
    pub fn new_at(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;
        Self::init(root.to_path_buf(), None)
    }

    fn init(root: PathBuf, temp: Option<tempfile::TempDir>) -> Result<Self> {
        run_git(&root, &["init", "--quiet"])?;
        run_git(&root, &["config", "user.email", "tests@example.com"])?;
        run_git(&root, &["config", "user.name", "tests"])?;
        fs::write(root.join("seed.txt"), "seed\n").context("write seed file")?;
        run_git(&root, &["add", "-A"])?;
        run_git(&root, &["commit", "--quiet", "-m", "seed"])?;
        Ok(Self { root, _temp: temp })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Run a git command in `workdir`, failing on non-zero exit.
pub fn run_git(workdir: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .status()
        .with_context(|| format!("spawn git {}", args.join(" ")))?;
    if !status.success() {
        return Err(anyhow!("git {} failed", args.join(" ")));
    }
    Ok(())
}

/// Write a minimal `metadata.json` carrying a version.
pub fn write_module_metadata(dir: &Path, version: &str) -> Result<()> {
    let metadata = json!({ "version": version });
    let mut payload = serde_json::to_string_pretty(&metadata).context("serialize metadata")?;
    payload.push('\n');
    fs::write(dir.join("metadata.json"), payload)
        .with_context(|| format!("write metadata in {}", dir.display()))
}
