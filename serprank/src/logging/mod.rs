//! Structured logging setup
//!
//! Installs a global `tracing` subscriber from [`LoggingConfig`]: JSON,
//! compact, pretty or the development format, written to stdout, a file, or
//! both. `RUST_LOG` overrides the configured level when set.

mod formatters;

pub use formatters::DevelopmentFormatter;

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::config::{LogFormat, LogLevel, LoggingConfig};

/// Error type for logging setup
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Log file or directory could not be created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown level name
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Result type for logging setup
pub type Result<T> = std::result::Result<T, LogError>;

/// Install the global subscriber
///
/// Returns the file writer's guard when logging to a file; keep it alive for
/// as long as logs should be flushed. Calling this after a subscriber is
/// already installed leaves the existing one in place.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let (writer, guard) = make_writer(config)?;
    let ansi = config.file.is_none();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    let installed = match config.format {
        LogFormat::Json => builder
            .json()
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Compact => builder.compact().with_target(true).try_init(),
        LogFormat::Pretty => builder
            .pretty()
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Default => builder
            .event_format(DevelopmentFormatter::new(ansi))
            .try_init(),
    };

    match installed {
        Ok(()) => Ok(guard),
        // Only fails when a global subscriber already exists
        Err(_) => Ok(None),
    }
}

fn make_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, Option<WorkerGuard>)> {
    let Some(path) = &config.file else {
        let writer = if config.stdout {
            BoxMakeWriter::new(std::io::stdout)
        } else {
            BoxMakeWriter::new(std::io::sink)
        };
        return Ok((writer, None));
    };

    let (file, guard) = non_blocking_file(path)?;
    let writer = if config.stdout {
        BoxMakeWriter::new(std::io::stdout.and(file))
    } else {
        BoxMakeWriter::new(file)
    };
    Ok((writer, Some(guard)))
}

fn non_blocking_file(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::other(format!("log path has no file name: {}", path.display()))
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Parse a level name
pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level
        .parse()
        .map_err(|_| LogError::InvalidLogLevel(level.to_string()))
}

/// Map a configured level to a `tracing` level
pub fn to_tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// Map a `tracing` level to a configured level
pub fn level_to_log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}
