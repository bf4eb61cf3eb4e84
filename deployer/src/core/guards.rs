//! Preflight guard checks for deploy actions.
//!
//! Guards are pure decisions: they never log or terminate the process
//! themselves. The driver acts on a [`GuardDecision`], which keeps the
//! exit-code contract testable without killing the test process.

use crate::core::types::DeployConfig;
use crate::exit_codes;

const NO_CONFIG_MESSAGE: &str =
    "No configuration file given, no config file found in current directory, and no global config present";

const WRITE_LOCK_NOTICE: &str =
    "Making changes to deployed environments has been administratively disabled.";

/// Outcome of a preflight guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Precondition holds; the deploy action may continue.
    Proceed,
    /// Precondition failed: log `messages` at fatal severity and exit with
    /// `code`. The codes are distinct per guard so scripts can tell them apart.
    Halt { code: i32, messages: Vec<String> },
}

/// Ensure a configuration was discovered and loaded before any deploy action
/// runs. Nothing downstream can run meaningfully without one.
pub fn ensure_config_present(config: Option<&DeployConfig>) -> GuardDecision {
    if config.is_some() {
        return GuardDecision::Proceed;
    }
    GuardDecision::Halt {
        code: exit_codes::NO_CONFIG,
        messages: vec![NO_CONFIG_MESSAGE.to_string()],
    }
}

/// Ensure the `deploy.write_lock` setting is not active.
///
/// A missing `[deploy]` table or a falsy lock value means deployments are
/// allowed.
pub fn ensure_write_unlocked(config: &DeployConfig) -> GuardDecision {
    let reason = config
        .deploy
        .write_lock
        .as_ref()
        .and_then(|lock| lock.reason());
    match reason {
        None => GuardDecision::Proceed,
        Some(reason) => GuardDecision::Halt {
            code: exit_codes::WRITE_LOCKED,
            messages: vec![
                WRITE_LOCK_NOTICE.to_string(),
                format!("Reason: {reason}"),
            ],
        },
    }
}
