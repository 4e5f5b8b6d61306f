//! File-based logging
//!
//! The TUI owns the terminal, so tracing output goes to a file and only when
//! `--debug` is given. Without it no subscriber is installed.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const DEFAULT_LOG_FILE: &str = "log/spotify-autoplay.log";

/// Initialize the logging system, appending to `log_file`.
///
/// The log level can be controlled via the `RUST_LOG` environment variable.
/// Defaults: this crate at DEBUG, `rspotify` at INFO, everything else WARN.
/// The returned guard flushes pending lines when dropped, so keep it alive
/// until shutdown.
pub fn init_logging(log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = match log_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = log_file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path has no file name: {}", log_file.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spotify_autoplay=debug,rspotify=info,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}", log_file.display());

    Ok(guard)
}

/// Log a Spotify API request and its result
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::trace!(operation = $operation, "API request successful"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "API request failed"),
        }
    };
}
