//! Logging initialization

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Initialize logging based on debug flag
/// Returns the log file path if debug logging is enabled
pub fn init_logging(debug: bool) -> Result<Option<PathBuf>> {
    if !debug {
        // Silent by default; stdout carries the report
        return Ok(None);
    }

    // A named temp file that outlives this process, so the log can be read afterwards
    let log_path = tempfile::Builder::new()
        .prefix("kuberef-")
        .suffix(".log")
        .tempfile()
        .and_then(|f| f.keep().map_err(|e| e.error))
        .map(|(_, path)| path)
        .unwrap_or_else(|_| std::env::temp_dir().join(format!("kuberef-{}.log", std::process::id())));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(log_path))
}
