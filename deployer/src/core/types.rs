//! Shared configuration types for deploy preflight checks.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use serde::Deserialize;

/// Deployer configuration (TOML).
///
/// Only the fields this crate reads are modeled; unknown keys in the file are
/// ignored so the config can carry settings for other subsystems.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeployConfig {
    pub deploy: DeploySettings,
}

/// The `[deploy]` table. A missing table behaves as all-defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeploySettings {
    /// Administrative deployment freeze. Set to a reason string (or `true`)
    /// to disable all deployments until cleared.
    pub write_lock: Option<WriteLock>,
}

/// The two shapes `write_lock` may take in the config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WriteLock {
    Enabled(bool),
    Reason(String),
}

impl WriteLock {
    /// Active lock reason, or `None` when the value is falsy.
    ///
    /// `false` and the empty string both count as unlocked. A bare `true`
    /// renders as the literal reason `true`.
    pub fn reason(&self) -> Option<String> {
        match self {
            WriteLock::Enabled(false) => None,
            WriteLock::Enabled(true) => Some("true".to_string()),
            WriteLock::Reason(reason) if reason.is_empty() => None,
            WriteLock::Reason(reason) => Some(reason.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_write_lock_reason_string() {
        let config: DeployConfig =
            toml::from_str("[deploy]\nwrite_lock = \"maintenance window\"\n").expect("parse");
        assert_eq!(
            config.deploy.write_lock,
            Some(WriteLock::Reason("maintenance window".to_string()))
        );
    }

    #[test]
    fn parses_write_lock_bool() {
        let config: DeployConfig =
            toml::from_str("[deploy]\nwrite_lock = true\n").expect("parse");
        assert_eq!(config.deploy.write_lock, Some(WriteLock::Enabled(true)));
    }

    #[test]
    fn missing_deploy_table_defaults_to_unlocked() {
        let config: DeployConfig = toml::from_str("").expect("parse");
        assert_eq!(config.deploy.write_lock, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: DeployConfig =
            toml::from_str("cachedir = \"/var/cache\"\n\n[deploy]\npurge_levels = [\"environment\"]\n")
                .expect("parse");
        assert_eq!(config, DeployConfig::default());
    }

    #[test]
    fn reason_maps_falsy_values_to_none() {
        assert_eq!(WriteLock::Enabled(false).reason(), None);
        assert_eq!(WriteLock::Reason(String::new()).reason(), None);
    }

    #[test]
    fn reason_maps_truthy_values_to_text() {
        assert_eq!(
            WriteLock::Enabled(true).reason(),
            Some("true".to_string())
        );
        assert_eq!(
            WriteLock::Reason("frozen for audit".to_string()).reason(),
            Some("frozen for audit".to_string())
        );
    }
}
