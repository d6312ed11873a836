//! Console relay.
//!
//! Five-method console capability plus the decorator that records each call
//! before delegating. Log-first ordering is deliberate: the entry carries the
//! call-time timestamp even if the delegate is slow.

use crate::format::{format_args, Level, LogValue};
use crate::store::LogStore;
use std::sync::Arc;

/// Console capability as the host application sees it.
pub trait ConsoleSink: Send + Sync {
    fn log(&self, args: &[LogValue]);
    fn info(&self, args: &[LogValue]);
    fn warn(&self, args: &[LogValue]);
    fn error(&self, args: &[LogValue]);
    fn debug(&self, args: &[LogValue]);
}

/// Console writing to stdout/stderr.
#[derive(Debug, Default)]
pub struct StdConsole;

impl ConsoleSink for StdConsole {
    fn log(&self, args: &[LogValue]) {
        println!("{}", format_args(args));
    }

    fn info(&self, args: &[LogValue]) {
        println!("[INFO] {}", format_args(args));
    }

    fn warn(&self, args: &[LogValue]) {
        eprintln!("[WARN] {}", format_args(args));
    }

    fn error(&self, args: &[LogValue]) {
        eprintln!("[ERROR] {}", format_args(args));
    }

    fn debug(&self, args: &[LogValue]) {
        println!("[DEBUG] {}", format_args(args));
    }
}

/// Decorator recording every call, then delegating to the captured original
/// with the identical arguments.
pub struct InstrumentedConsole {
    inner: Arc<dyn ConsoleSink>,
    store: LogStore,
}

impl InstrumentedConsole {
    pub fn new(inner: Arc<dyn ConsoleSink>, store: LogStore) -> Self {
        Self { inner, store }
    }
}

impl ConsoleSink for InstrumentedConsole {
    fn log(&self, args: &[LogValue]) {
        self.store.append(Level::Log, args);
        self.inner.log(args);
    }

    fn info(&self, args: &[LogValue]) {
        self.store.append(Level::Info, args);
        self.inner.info(args);
    }

    fn warn(&self, args: &[LogValue]) {
        self.store.append(Level::Warn, args);
        self.inner.warn(args);
    }

    fn error(&self, args: &[LogValue]) {
        self.store.append(Level::Error, args);
        self.inner.error(args);
    }

    fn debug(&self, args: &[LogValue]) {
        self.store.append(Level::Debug, args);
        self.inner.debug(args);
    }
}
