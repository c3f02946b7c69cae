//! Logger that forwards to `tracing`

use super::traits::Logger;

/// Forwards every message to the `tracing` macros under the
/// `dvm_secrets` target, so a host that installs a subscriber gets the
/// secret subsystem's events alongside its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "dvm_secrets", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "dvm_secrets", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "dvm_secrets", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "dvm_secrets", "{}", message);
    }
}
