//! Deploy preflight and audit-record CLI.
//!
//! `check` gates a deployment behind the configuration and write-lock guards;
//! `record` persists the audit record for a completed deploy attempt. The
//! deployment itself (module resolution, checkout, purge) is orchestrated
//! elsewhere; this driver owns the exit-code contract around it.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::error;

use deployer::core::guards::{GuardDecision, ensure_config_present, ensure_write_unlocked};
use deployer::exit_codes;
use deployer::io::config::load_discovered_config;
use deployer::io::environment::CodeEnvironment;
use deployer::io::manifest::write_deployment_record;
use deployer::logging;

#[derive(Parser)]
#[command(
    name = "deployer",
    version,
    about = "Environment deploy gating and audit records"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the deploy preflight guards (config presence, write lock).
    Check {
        /// Path to the deployer config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write the deployment record for a deployed environment.
    Record {
        /// Root directory of the deployed environment.
        environment: PathBuf,

        /// When the deploy attempt started; recorded verbatim.
        #[arg(long)]
        started_at: String,

        #[command(flatten)]
        outcome: Outcome,

        /// Environment metadata merged into the record, as a JSON object.
        #[arg(long)]
        info: Option<String>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Outcome {
    /// Mark the deploy attempt as successful.
    #[arg(long)]
    success: bool,

    /// Mark the deploy attempt as failed.
    #[arg(long)]
    failed: bool,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { config } => cmd_check(config),
        Command::Record {
            environment,
            started_at,
            outcome,
            info,
        } => cmd_record(environment, &started_at, outcome.success, info.as_deref()),
    }
}

fn cmd_check(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_discovered_config(config_path.as_deref())?;
    enforce(ensure_config_present(config.as_ref()));
    if let Some(config) = config {
        enforce(ensure_write_unlocked(&config));
    }
    Ok(())
}

fn cmd_record(
    environment: PathBuf,
    started_at: &str,
    success: bool,
    info: Option<&str>,
) -> Result<()> {
    let info = parse_info(info)?;
    let environment = CodeEnvironment::new(environment, info);
    let started_at = parse_started_at(started_at);
    let path = write_deployment_record(&environment, &started_at, success)?;
    println!("{}", path.display());
    Ok(())
}

/// Act on a guard decision: log at fatal severity and exit on `Halt`.
fn enforce(decision: GuardDecision) {
    if let GuardDecision::Halt { code, messages } = decision {
        for message in &messages {
            error!("{message}");
        }
        process::exit(code);
    }
}

/// Parse `--info` as a JSON object; defaults to empty.
fn parse_info(raw: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    let value: Value = serde_json::from_str(raw).context("parse --info as JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("--info must be a JSON object, got {other}"),
    }
}

/// Carry `--started-at` through as JSON when it parses, verbatim text otherwise.
fn parse_started_at(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["deployer", "check"]);
        assert!(matches!(cli.command, Command::Check { config: None }));
    }

    #[test]
    fn parse_check_with_config() {
        let cli = Cli::parse_from(["deployer", "check", "--config", "custom.toml"]);
        match cli.command {
            Command::Check { config } => {
                assert_eq!(config, Some(PathBuf::from("custom.toml")));
            }
            Command::Record { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn parse_record_requires_an_outcome_flag() {
        let result = Cli::try_parse_from([
            "deployer",
            "record",
            "/env",
            "--started-at",
            "2019-01-01 23:23:22 +0000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_record_rejects_both_outcome_flags() {
        let result = Cli::try_parse_from([
            "deployer",
            "record",
            "/env",
            "--started-at",
            "t0",
            "--success",
            "--failed",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn started_at_stays_verbatim_text_when_not_json() {
        assert_eq!(
            parse_started_at("2019-01-01 23:23:22 +0000"),
            json!("2019-01-01 23:23:22 +0000")
        );
    }

    #[test]
    fn started_at_parses_json_scalars() {
        assert_eq!(parse_started_at("1546385002"), json!(1546385002));
        assert_eq!(parse_started_at("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn info_defaults_to_empty_object() {
        assert_eq!(parse_info(None).expect("parse"), Map::new());
    }

    #[test]
    fn info_rejects_non_objects() {
        let err = parse_info(Some("[1, 2]")).expect_err("should fail");
        assert!(err.to_string().contains("must be a JSON object"));
    }
}
