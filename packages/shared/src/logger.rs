//! Logging setup utilities for the Hiroba chat binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable, colored output
    #[default]
    #[value(alias = "text")]
    Pretty,
    /// One JSON object per line (for log collectors)
    Json,
}

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every Hiroba crate and the running binary log at `default_log_level`.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    ["hiroba_shared", "hiroba_server", "hiroba_client", binary_name]
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
/// * `format` - Pretty or JSON output
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::{LogFormat, setup_logger};
///
/// setup_logger("hiroba-server", "debug", LogFormat::Pretty);
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
