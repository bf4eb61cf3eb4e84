//! Deployment record persistence.
//!
//! After a deploy attempt the driver records what happened into a fixed file
//! inside the environment, whether or not the deploy itself succeeded. Losing
//! module metadata degrades the record; it never blocks the write.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::core::record::{ModuleDeploy, build_record};
use crate::io::environment::{DeployedModule, Environment};

/// Record filename, relative to the environment root.
pub const DEPLOY_RECORD_FILENAME: &str = ".deploy-record.json";

/// Write the audit record for one deploy attempt.
///
/// `started_at` is preserved verbatim; `finished_at` is captured here.
/// Module metadata is gathered best-effort: a failed or unavailable revision
/// lookup records a null SHA, and a failed enumeration records an empty
/// module list. Only the final file write can fail.
pub fn write_deployment_record<E: Environment>(
    environment: &E,
    started_at: &Value,
    success: bool,
) -> Result<PathBuf> {
    // Two error boundaries, kept separate: the per-module lookup degrades a
    // single field, the enumeration boundary degrades the whole list.
    let module_deploys = match environment.modules() {
        Ok(modules) => modules
            .iter()
            .map(|module| module_deploy(module.as_ref()))
            .collect(),
        Err(err) => {
            debug!(
                path = %environment.path().display(),
                error = %err,
                "unable to gather module deploy data for deploy record"
            );
            Vec::new()
        }
    };

    let record = build_record(
        environment.info(),
        started_at,
        Utc::now(),
        success,
        &module_deploys,
    );

    let path = environment.path().join(DEPLOY_RECORD_FILENAME);
    let mut payload = serde_json::to_string_pretty(&record).context("serialize deploy record")?;
    payload.push('\n');
    fs::write(&path, payload).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

fn module_deploy(module: &dyn DeployedModule) -> ModuleDeploy {
    // "no revision capability" and "lookup failed" both record a null sha.
    let sha = module.repo().and_then(|repo| repo.head().ok());
    ModuleDeploy {
        name: module.name().to_string(),
        version: module.version(),
        sha,
    }
}
