//! Deployer configuration discovery and loading.
//!
//! Discovery order: explicit `--config` path, then `deployer.toml` in the
//! working directory, then the system-wide path. "No candidate anywhere" is
//! not an error here; the presence guard decides what absence means.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::types::DeployConfig;

/// Config filename looked up in the working directory.
pub const LOCAL_CONFIG_FILENAME: &str = "deployer.toml";
/// System-wide fallback config path.
pub const GLOBAL_CONFIG_PATH: &str = "/etc/deployer/deployer.toml";

/// Locate the config file: explicit path, then working directory, then global.
///
/// An explicit path is always returned as-is; if it does not exist the load
/// step reports that as an error rather than silently falling back.
pub fn discover_config(explicit: Option<&Path>, cwd: &Path, global: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = cwd.join(LOCAL_CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    if global.is_file() {
        return Some(global.to_path_buf());
    }
    None
}

/// Load config from a TOML file.
pub fn load_config(path: &Path) -> Result<DeployConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: DeployConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

/// Discover and load the config for a CLI invocation.
///
/// Returns `None` when no config file exists anywhere; a file that exists but
/// cannot be read or parsed is an error, not an absence.
pub fn load_discovered_config(explicit: Option<&Path>) -> Result<Option<DeployConfig>> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    match discover_config(explicit, &cwd, Path::new(GLOBAL_CONFIG_PATH)) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Ok(Some(load_config(&path)?))
        }
        None => {
            debug!("no config file discovered");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::WriteLock;

    #[test]
    fn explicit_path_wins_over_local_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(LOCAL_CONFIG_FILENAME), "").expect("write local");
        let explicit = temp.path().join("elsewhere.toml");

        let discovered = discover_config(
            Some(&explicit),
            temp.path(),
            Path::new("/nonexistent/global.toml"),
        );
        assert_eq!(discovered, Some(explicit));
    }

    #[test]
    fn local_file_wins_over_global() {
        let temp = tempfile::tempdir().expect("tempdir");
        let local = temp.path().join(LOCAL_CONFIG_FILENAME);
        fs::write(&local, "").expect("write local");
        let global_dir = tempfile::tempdir().expect("tempdir");
        let global = global_dir.path().join("deployer.toml");
        fs::write(&global, "").expect("write global");

        let discovered = discover_config(None, temp.path(), &global);
        assert_eq!(discovered, Some(local));
    }

    #[test]
    fn falls_back_to_global_then_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        let global_dir = tempfile::tempdir().expect("tempdir");
        let global = global_dir.path().join("deployer.toml");

        assert_eq!(discover_config(None, temp.path(), &global), None);

        fs::write(&global, "").expect("write global");
        assert_eq!(
            discover_config(None, temp.path(), &global),
            Some(global.clone())
        );
    }

    #[test]
    fn loads_write_lock_from_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("deployer.toml");
        fs::write(&path, "[deploy]\nwrite_lock = \"maintenance window\"\n").expect("write");

        let config = load_config(&path).expect("load");
        assert_eq!(
            config.deploy.write_lock,
            Some(WriteLock::Reason("maintenance window".to_string()))
        );
    }

    #[test]
    fn load_errors_on_missing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_config(&temp.path().join("missing.toml")).expect_err("load should fail");
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("deployer.toml");
        fs::write(&path, "[deploy\nwrite_lock = ").expect("write");

        let err = load_config(&path).expect_err("load should fail");
        assert!(err.to_string().contains("parse"));
    }
}
