/// Logging setup for the CLI.
///
/// Logs go to stderr by default. With a log directory (from `--log-dir` or the
/// `HOURSTAMP_LOG_DIR` environment variable) they are appended to
/// `{log_dir}/hourstamp.log` instead, without ANSI codes.
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "hourstamp.log";

/// Pick the log directory: explicit argument first, then `HOURSTAMP_LOG_DIR`.
pub fn resolve_log_dir(cli_dir: Option<PathBuf>) -> Option<PathBuf> {
    cli_dir.or_else(|| env::var_os("HOURSTAMP_LOG_DIR").map(PathBuf::from))
}

/// Initializes the global tracing subscriber.
///
/// Default level is INFO, overridable via RUST_LOG. Calling this twice keeps
/// the first subscriber.
pub fn init_logging(log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir).with_context(|| {
                format!("Failed to create log directory: {}", log_dir.display())
            })?;

            let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .try_init()
                .ok(); // Ignore error if already initialized
        }
        None => {
            let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()
                .ok();
        }
    }

    tracing::debug!("logging initialized");
    Ok(())
}
