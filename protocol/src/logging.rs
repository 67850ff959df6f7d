//! # Structured Logging
//!
//! The library only emits `tracing` events; hosts choose where they go.
//! [`init_logging`] is a convenience for binaries and tests that want the
//! usual stderr subscriber with `RUST_LOG` filtering.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty" in any case. Anything else is `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `default_level` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"sirius_protocol=debug"`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
            .try_init()?,
    }

    tracing::info!("logging initialized (format={:?})", format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::from_str_lossy("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("xml"), LogFormat::Pretty);
    }

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        let _ = init_logging("warn", LogFormat::Pretty);
        assert!(init_logging("warn", LogFormat::Json).is_err());
    }
}
