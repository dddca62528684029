use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use configs::{LogFormat, LoggingConfig};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

/// Resolve the filter: `RUST_LOG` first, then the configured directive,
/// then `info,tower_http=info,axum=info,sqlx=warn`.
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    configured
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Open the log file for appending, creating it and its parent directory if needed.
pub fn open_log_file(path: &str) -> anyhow::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("couldn't create log directory {}", parent.display()))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("couldn't open log file {path}"))
}

/// Install the global tracing subscriber.
/// - Every event goes to stdout and to the append-only log file
/// - Compact text or JSON lines depending on `logging.format`
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(&cfg.file)?);
    let writer = io::stdout.and(file);
    let builder = fmt()
        .with_env_filter(env_filter(cfg.filter.as_deref()))
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);
    let installed = match cfg.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("couldn't install tracing subscriber: {e}"))
}
