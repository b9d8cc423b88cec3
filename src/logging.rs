//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr.

use std::{fs, io, path::Path};

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "MOON_CONSOLE_LOG";
pub const LOG_FILE: &str = "moon-console.log";
const DEFAULT_DIRECTIVE: &str = "info";

/// Directive precedence: explicit level, then `MOON_CONSOLE_LOG`, then info.
pub fn filter(level: Option<&str>) -> EnvFilter {
    if let Some(level) = level {
        if let Ok(filter) = EnvFilter::try_new(level) {
            return filter;
        }
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the global subscriber writing to a daily file under `dir`.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(dir: &Path, level: Option<&str>) -> io::Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE));
    let layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);
    tracing_subscriber::registry()
        .with(filter(level))
        .with(layer)
        .try_init()
        .map_err(io::Error::other)?;
    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        assert_eq!(filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            filter(Some("moon_console=trace")).to_string(),
            "moon_console=trace"
        );
    }
}
