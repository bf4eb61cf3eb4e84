//! Tracing setup for deployer CLI commands.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: Operator diagnostics via `RUST_LOG`, output
//!   to stderr. Guard halts are logged here at error level.
//!
//! - **Deploy records (`io/manifest`)**: Product artifacts written into the
//!   environment. Always written, unaffected by `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing subscriber for CLI commands.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset, which keeps guard
/// halt messages visible and debug diagnostics quiet.
///
/// # Example
/// ```bash
/// RUST_LOG=deployer=debug deployer check
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
