//! Logging setup shared by the service binary and tests.

/// Install the process-wide subscriber; later calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filter, output format).
pub mod tracing;

pub use self::tracing::LogFormat;
