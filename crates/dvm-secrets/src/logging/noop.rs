//! No-op logger implementation

use std::sync::Arc;

use super::traits::{Logger, SharedLogger};

/// A logger that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    /// Create a new no-op logger
    pub fn new() -> Self {
        Self
    }

    /// A shared no-op logger, the default for library constructors
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
