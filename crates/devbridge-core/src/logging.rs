//! Logging configuration using tracing

use std::path::PathBuf;

use serde_json::Value;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/devbridge/logs/` so that stdout stays
/// free for the method channel. Log level is controlled by the
/// `DEVBRIDGE_LOG` environment variable.
///
/// # Examples
/// ```bash
/// DEVBRIDGE_LOG=debug devbridge --headless
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "devbridge.log");

    let env_filter = EnvFilter::try_from_env("DEVBRIDGE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("devbridge=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("devbridge starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("devbridge").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join("devbridge.log"))
}

/// How method calls reach the bridge for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// NDJSON calls on stdin, responses on stdout, until EOF
    Stream,
    /// One call from the command line
    SingleCall,
}

impl std::fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelMode::Stream => write!(f, "NDJSON over stdin/stdout"),
            ChannelMode::SingleCall => write!(f, "single call"),
        }
    }
}

/// Startup record for a channel session, stamped with the host it drives
pub fn log_channel_start(mode: ChannelMode, sdk_level: u32, package_name: &str) {
    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("Method channel open: {}", mode);
    tracing::info!("Host API level {}, package {}", sdk_level, package_name);
    tracing::info!("═══════════════════════════════════════════════════════");
}

/// Span covering one method call
pub fn call_span(method: &str, id: Option<&Value>) -> tracing::Span {
    tracing::info_span!("call", method = method, id = %correlation_label(id))
}

/// Correlation id as it appears in log lines; `-` when the call has none
pub fn correlation_label(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}
