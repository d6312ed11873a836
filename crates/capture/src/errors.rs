//! Uncaught error and unhandled rejection capture.
//!
//! Passive observers: the host keeps its default error reporting; each
//! occurrence is recorded as one entry and nothing is suppressed.

use crate::format::{Level, LogValue};
use crate::store::LogStore;

/// Source position of an uncaught error, when the runtime provides one.
#[derive(Clone, Debug)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// An uncaught error surfaced by the host's global error hook.
#[derive(Clone, Debug)]
pub struct UncaughtError {
    pub message: String,
    pub location: Option<SourceLocation>,
}

/// Subscriber for the host's global error and rejection signals.
#[derive(Clone)]
pub struct ErrorMonitor {
    store: LogStore,
}

impl ErrorMonitor {
    pub fn new(store: LogStore) -> Self {
        Self { store }
    }

    /// One entry per uncaught error, with source position where available.
    pub fn on_uncaught(&self, err: &UncaughtError) {
        let message = match &err.location {
            Some(loc) => format!("{} ({}:{}:{})", err.message, loc.file, loc.line, loc.column),
            None => err.message.clone(),
        };
        self.store.append_text(Level::WindowError, message);
    }

    /// One entry per unhandled asynchronous rejection.
    pub fn on_unhandled_rejection(&self, reason: &LogValue) {
        self.store.append(Level::Unhandled, std::slice::from_ref(reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use std::sync::Arc;

    fn monitor() -> (ErrorMonitor, LogStore) {
        let store = LogStore::new(Arc::new(MemorySessionStore::new()));
        (ErrorMonitor::new(store.clone()), store)
    }

    #[test]
    fn test_uncaught_with_location() {
        let (monitor, store) = monitor();
        monitor.on_uncaught(&UncaughtError {
            message: "x is not defined".into(),
            location: Some(SourceLocation {
                file: "app.js".into(),
                line: 42,
                column: 7,
            }),
        });

        let lines = store.snapshot();
        assert!(lines[0].contains("WINDOW.ERROR x is not defined (app.js:42:7)"));
    }

    #[test]
    fn test_uncaught_without_location() {
        let (monitor, store) = monitor();
        monitor.on_uncaught(&UncaughtError {
            message: "boom".into(),
            location: None,
        });
        assert!(store.snapshot()[0].ends_with("WINDOW.ERROR boom"));
    }

    #[test]
    fn test_unhandled_rejection() {
        let (monitor, store) = monitor();
        monitor.on_unhandled_rejection(&LogValue::ErrorLike {
            message: "request aborted".into(),
            stack: None,
        });
        assert!(store.snapshot()[0].contains("UNHANDLED request aborted"));
    }
}
