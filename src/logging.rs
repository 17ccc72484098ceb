//! Log setup for applications embedding the updater

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_FILTER_ENV: &str = "RELEASE_UPDATER_LOG";

/// Installs a global subscriber that writes to `log_path`.
///
/// The returned guard flushes buffered lines when dropped, so the caller must
/// keep it alive for as long as it wants logs written.
pub fn init(log_path: &Path, json: bool) -> anyhow::Result<WorkerGuard> {
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .with_context(|| format!("log path has no file name: {:?}", log_path))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {:?}", dir))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
