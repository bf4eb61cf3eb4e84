//! Deployment record assembly.
//!
//! The record is the environment's `info` mapping merged with the outcome of
//! one deploy attempt. Assembly is pure; persistence lives in `io/manifest`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// One entry in the record's `module_deploys` array.
///
/// `version` and `sha` serialize as `null` when unknown, so every enumerated
/// module keeps its slot in the array.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModuleDeploy {
    pub name: String,
    pub version: Option<String>,
    pub sha: Option<String>,
}

/// Merge environment metadata with the outcome of one deploy attempt.
///
/// `started_at` is carried through verbatim. Keys injected here win over
/// same-named keys in `info`.
pub fn build_record(
    info: &Map<String, Value>,
    started_at: &Value,
    finished_at: DateTime<Utc>,
    success: bool,
    module_deploys: &[ModuleDeploy],
) -> Map<String, Value> {
    let mut record = info.clone();
    record.insert("started_at".to_string(), started_at.clone());
    record.insert("finished_at".to_string(), json!(finished_at.to_rfc3339()));
    record.insert("deploy_success".to_string(), json!(success));
    record.insert("module_deploys".to_string(), json!(module_deploys));
    record
}
