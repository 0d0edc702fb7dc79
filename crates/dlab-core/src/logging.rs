/// Logging configuration and initialization
///
/// Sets up the tracing subscriber used by lab hosts: a console layer on
/// stderr plus an optional hourly-rolling JSON file layer.
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, registry::Registry, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "DLAB_LOG";

/// Install the global subscriber.
///
/// The filter comes from `DLAB_LOG` when set, else from `config.level`.
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let registry = Registry::default().with(env_filter).with(console_layer);

    let result = if let Some(log_dir) = &config.log_dir {
        let file_appender = rolling::hourly(log_dir, "dlab.log");
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
    } else {
        registry.try_init()
    };

    result.map_err(|e| Error::Logging(e.to_string()))
}

/// Log a user-facing action with context
pub fn log_user_action(action: &str, details: &str) {
    tracing::info!(action = action, details = details, "user action");
}
