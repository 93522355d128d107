//! Structured Logger
//!
//! Wraps `tracing` to provide JSON-formatted file output (NDJSON, rotated
//! daily) and an optional human-readable stderr layer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::event_logger::EVENT_TARGET;

pub struct LogOptions {
    pub dir: PathBuf,
    pub level: String,
    /// Also write to stderr. Off for the REPL unless `--verbose`.
    pub console: bool,
}

/// Filter for `level`, with chat events always kept at `info`.
pub fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("{level},{EVENT_TARGET}=info"))
}

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logger(options: &LogOptions) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&options.level));

    // Writes NDJSON to `<dir>/groqchat.log.YYYY-MM-DD`
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("groqchat.log")
        .build(&options.dir)
        .with_context(|| format!("Failed to open log directory {}", options.dir.display()))?;

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    let console_layer = options.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Global logger already initialised")?;

    Ok(())
}
