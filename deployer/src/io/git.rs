//! Git adapter for module revision lookups.
//!
//! Deploy records capture the commit each git-backed module was left at, so we
//! keep a small, explicit wrapper around `git` subprocess calls.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

/// Revision lookup capability for source-control backed modules.
///
/// Forge-style modules have no backing repository and never offer an
/// implementation of this trait.
pub trait RevisionSource {
    /// Current commit SHA of the backing repository.
    fn head(&self) -> Result<String>;
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

impl RevisionSource for Git {
    /// Return the current HEAD SHA (full length).
    fn head(&self) -> Result<String> {
        let out = self.run_capture(&["rev-parse", "HEAD"])?;
        let sha = out.trim().to_string();
        debug!(workdir = %self.workdir.display(), sha = %sha, "resolved module head");
        Ok(sha)
    }
}
