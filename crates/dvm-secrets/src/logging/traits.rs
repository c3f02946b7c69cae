//! Logger trait definition

use std::sync::Arc;

/// Logger abstraction injected into the registry, resolver and providers
///
/// Implementations:
/// - `NoOpLogger`: silent, the library default
/// - `ConsoleLogger`: prefixed lines on stdout/stderr
/// - `TracingLogger`: forwards to the `tracing` crate
///
/// Messages may name providers and secrets but must never contain a
/// secret value or the raw text of an inline reference.
pub trait Logger: Send + Sync {
    /// Log a debug message
    fn debug(&self, message: &str);

    /// Log an info message
    fn info(&self, message: &str);

    /// Log a warning message
    fn warn(&self, message: &str);

    /// Log an error message
    fn error(&self, message: &str);
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Convenience macros for logging
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}
