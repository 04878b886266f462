//! Logging setup utilities for the Irori chat server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter defaults to `info` globally and to `default_log_level` for the
/// given application crate. It can be overridden entirely with the `RUST_LOG`
/// environment variable.
///
/// # Arguments
///
/// * `app_name` - The application crate name (e.g., `env!("CARGO_PKG_NAME")`)
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use irori_shared::logger::setup_logger;
///
/// setup_logger("irori-server", "debug");
/// ```
pub fn setup_logger(app_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "info,{}={}",
                    app_name.replace("-", "_"),
                    default_log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
