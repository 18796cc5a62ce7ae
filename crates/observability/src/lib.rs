//! Tracing/logging setup shared by the storefront binaries and tests.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide tracing from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
