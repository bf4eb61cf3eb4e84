//! Deploy gating and audit records for environment deployments.
//!
//! This crate implements the final stage of a code deployment workflow:
//! preflight guards that decide whether a deploy is permitted to proceed, and
//! a record writer that durably persists what happened once a deploy attempt
//! completes. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (guard decisions, record
//!   assembly). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config loading, git lookups,
//!   record persistence). Isolated to enable mocking in tests.
//!
//! The binary driver acts on guard decisions, turning a
//! [`core::guards::GuardDecision::Halt`] into fatal logs and a process exit
//! with a stable status code from [`exit_codes`].

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
