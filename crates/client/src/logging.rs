//! Tracing subscriber setup for the terminal client.
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logs to stderr, and to `<log_dir>/<session>/client.log` when a directory
/// is given. Keep the returned guard alive until exit so the file writer
/// flushes.
pub fn setup_logging(
    log_dir: Option<&Path>,
    session_id: Option<&str>,
) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let (file_layer, guard, session_log_dir) = match log_dir {
        Some(log_dir) => {
            let session = session_id
                .map(str::to_string)
                .unwrap_or_else(default_session_id);
            let session_log_dir = log_dir.join(session);
            std::fs::create_dir_all(&session_log_dir).with_context(|| {
                format!("creating log directory {}", session_log_dir.display())
            })?;

            let file_appender = tracing_appender::rolling::never(&session_log_dir, "client.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard), Some(session_log_dir))
        }
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    if let Some(dir) = session_log_dir {
        tracing::info!("Log file: {}/client.log", dir.display());
    }
    Ok(guard)
}

fn default_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{}", timestamp)
}
