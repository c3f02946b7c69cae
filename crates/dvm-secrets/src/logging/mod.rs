//! Logging abstractions

mod traits;
mod noop;
mod console;
mod tracing_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use tracing_logger::TracingLogger;

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::Logger;

    /// Captures every message so tests can assert nothing sensitive was logged
    #[derive(Debug, Default)]
    pub struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingLogger {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().clone()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.lines.lock().iter().any(|line| line.contains(needle))
        }

        fn record(&self, level: &str, message: &str) {
            self.lines.lock().push(format!("{} {}", level, message));
        }
    }

    impl Logger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.record("DEBUG", message);
        }

        fn info(&self, message: &str) {
            self.record("INFO", message);
        }

        fn warn(&self, message: &str) {
            self.record("WARN", message);
        }

        fn error(&self, message: &str) {
            self.record("ERROR", message);
        }
    }
}
