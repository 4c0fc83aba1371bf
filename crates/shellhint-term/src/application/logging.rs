use std::fs;

use anyhow::anyhow;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Sends tracing output to the configured log file. The terminal is owned by
/// the UI, so nothing is ever written to stdout or stderr. Keep the returned
/// guard alive until shutdown or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
    let log_file = Config::log_file();
    let dir = log_file
        .parent()
        .ok_or_else(|| anyhow!("log file {} has no parent directory", log_file.display()))?;
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow!("log file {} has no file name", log_file.display()))?;
    fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(Config::get(ConfigKey::LogLevel))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::debug!(file = %log_file.display(), "logging initialised");

    return Ok(guard);
}
