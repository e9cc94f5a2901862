//! Logging setup for the Sanmoku binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate whose spans are enabled alongside the binary's own target.
const SERVER_CRATE: &str = "sanmoku_server";

/// Build the default filter directive for a binary.
///
/// Both the server library and the binary itself log at `default_log_level`.
fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets = vec![SERVER_CRATE];
    if binary_target != SERVER_CRATE {
        targets.push(binary_target.as_str());
    }
    targets.push("tower_http");

    targets
        .iter()
        .map(|target| format!("{target}={default_log_level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level can be overridden using the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use sanmoku_shared::logger::setup_logger;
///
/// setup_logger("sanmoku-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
