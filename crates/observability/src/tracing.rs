//! Tracing/logging initialization.
//!
//! Filtering follows `RUST_LOG` (default `info`). Output is JSON unless
//! `LOG_FORMAT=compact` asks for human-readable lines.

use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; unknown values fall back to JSON.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" | "pretty" => LogFormat::Compact,
            _ => LogFormat::Json,
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match format {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Compact => builder.compact().with_target(true).try_init(),
    };
}
