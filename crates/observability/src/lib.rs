//! Tracing/logging setup shared by every process embedding the ledger.

pub mod tracing;

pub use self::tracing::{ConfigError, LogConfig, LogFormat};

/// Initialize process-wide observability from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&LogConfig::from_env());
}
