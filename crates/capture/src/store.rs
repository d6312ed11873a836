//! Bounded, persisted log store.

use crate::format::{self, format_args, Level, LogValue};
use crate::session::SessionStore;
use chrono::{DateTime, Local, NaiveTime};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

/// Maximum number of retained entries. Oldest entries are evicted first.
pub const MAX_ENTRIES: usize = 500;

/// Session key holding the persisted snapshot.
pub const SNAPSHOT_KEY: &str = "debug_log";

/// A single captured log line. Immutable once appended.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, message: String) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message,
        }
    }

    /// Rendered form: `[HH:MM:SS.mmm] TAG message`.
    pub fn render(&self) -> String {
        format::format_line(self.timestamp, self.level, &self.message)
    }

    /// Best-effort reverse of [`render`](Self::render), for reloading
    /// persisted lines. Unparsable lines become LOG entries with the raw
    /// text as their message.
    fn parse(line: &str) -> Self {
        let fallback = || Self::new(Level::Log, line.to_string());

        let Some(rest) = line.strip_prefix('[') else {
            return fallback();
        };
        let Some((stamp, rest)) = rest.split_once("] ") else {
            return fallback();
        };
        let Some((tag, message)) = rest.split_once(' ') else {
            return fallback();
        };
        let Some(level) = Level::from_tag(tag) else {
            return fallback();
        };

        let timestamp = NaiveTime::parse_from_str(stamp, "%H:%M:%S%.3f")
            .ok()
            .and_then(|t| Local::now().with_time(t).single())
            .unwrap_or_else(Local::now);

        Self {
            timestamp,
            level,
            message: message.to_string(),
        }
    }
}

/// Observer notified after every store mutation. The dashboard panel
/// implements this to refresh its view; the store never calls back into it
/// while holding its own lock.
pub trait RenderSink: Send + Sync {
    fn logs_updated(&self, lines: &[String]);
}

/// Bounded FIFO sequence of log entries, mirrored to a persisted snapshot.
///
/// Cheaply cloneable handle; all clones share one sequence. The store is the
/// sole owner of its entries and the only writer is `append`/`clear`.
#[derive(Clone)]
pub struct LogStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    entries: RwLock<VecDeque<LogEntry>>,
    session: Arc<dyn SessionStore>,
    sink: RwLock<Option<Arc<dyn RenderSink>>>,
}

impl LogStore {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                entries: RwLock::new(VecDeque::new()),
                session,
                sink: RwLock::new(None),
            }),
        }
    }

    /// Attach the external render sink.
    pub fn set_render_sink(&self, sink: Arc<dyn RenderSink>) {
        *self.inner.sink.write() = Some(sink);
    }

    /// Format and append one entry, evicting the oldest entries if the
    /// capacity would be exceeded, then persist and notify.
    pub fn append(&self, level: Level, args: &[LogValue]) {
        self.push(LogEntry::new(level, format_args(args)));
    }

    /// Append a pre-formatted message.
    pub fn append_text(&self, level: Level, message: impl Into<String>) {
        self.push(LogEntry::new(level, message.into()));
    }

    fn push(&self, entry: LogEntry) {
        let lines = {
            let mut entries = self.inner.entries.write();
            while entries.len() >= MAX_ENTRIES {
                entries.pop_front();
            }
            entries.push_back(entry);
            entries.iter().map(LogEntry::render).collect::<Vec<_>>()
        };
        self.persist(&lines);
        self.notify(&lines);
    }

    /// Current entries as rendered lines, most recent last.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.entries.read().iter().map(LogEntry::render).collect()
    }

    /// Snapshot joined by line breaks.
    pub fn snapshot_text(&self) -> String {
        self.snapshot().join("\n")
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Empty the sequence and erase the persisted snapshot.
    pub fn clear(&self) {
        self.inner.entries.write().clear();
        self.inner.session.remove_item(SNAPSHOT_KEY);
        self.notify(&[]);
    }

    /// Best-effort reload of a previous snapshot. Absent or corrupt values
    /// yield an empty store, never an error.
    pub fn load(&self) {
        let Some(raw) = self.inner.session.get_item(SNAPSHOT_KEY) else {
            return;
        };
        let Ok(lines) = serde_json::from_str::<Vec<String>>(&raw) else {
            tracing::debug!("discarding corrupt log snapshot");
            return;
        };

        let mut entries = self.inner.entries.write();
        entries.clear();
        for line in lines.iter().rev().take(MAX_ENTRIES).rev() {
            entries.push_back(LogEntry::parse(line));
        }
    }

    fn persist(&self, lines: &[String]) {
        let Ok(json) = serde_json::to_string(lines) else {
            return;
        };
        // Persistence is a reload convenience, not a correctness requirement.
        if let Err(err) = self.inner.session.set_item(SNAPSHOT_KEY, &json) {
            tracing::debug!(%err, "log snapshot write failed, continuing in memory");
        }
    }

    fn notify(&self, lines: &[String]) {
        let sink = self.inner.sink.read().clone();
        if let Some(sink) = sink {
            sink.logs_updated(lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use parking_lot::Mutex;

    fn store() -> (LogStore, Arc<MemorySessionStore>) {
        let session = Arc::new(MemorySessionStore::new());
        (LogStore::new(session.clone()), session)
    }

    #[test]
    fn test_append_and_snapshot() {
        let (store, _) = store();
        store.append(Level::Warn, &["x".into(), serde_json::json!(1).into()]);

        let lines = store.snapshot();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN x 1"));
    }

    #[test]
    fn test_capacity_invariant() {
        let (store, _) = store();
        for i in 0..=MAX_ENTRIES {
            store.append_text(Level::Log, format!("entry {i}"));
        }

        assert_eq!(store.len(), MAX_ENTRIES);
        let lines = store.snapshot();
        // First append evicted, second append now oldest.
        assert!(lines[0].contains("entry 1"));
        assert!(!lines.iter().any(|l| l.contains("entry 0 ") || l.ends_with("entry 0")));
        assert!(lines.last().unwrap().contains(&format!("entry {MAX_ENTRIES}")));
    }

    #[test]
    fn test_persistence_round_trip() {
        let (store, session) = store();
        store.append_text(Level::Nav, "push /projects");
        store.append_text(Level::Fetch, "GET 200 12ms");

        let reloaded = LogStore::new(session);
        reloaded.load();
        assert_eq!(reloaded.len(), 2);
        let lines = reloaded.snapshot();
        assert!(lines[0].contains("NAV push /projects"));
        assert!(lines[1].contains("FETCH GET 200 12ms"));
    }

    #[test]
    fn test_load_tolerates_corrupt_snapshot() {
        let session = Arc::new(MemorySessionStore::new());
        session.set_item(SNAPSHOT_KEY, "{not json").unwrap();

        let store = LogStore::new(session);
        store.load();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_tolerates_foreign_lines() {
        let session = Arc::new(MemorySessionStore::new());
        session
            .set_item(SNAPSHOT_KEY, r#"["no brackets here"]"#)
            .unwrap();

        let store = LogStore::new(session);
        store.load();
        assert_eq!(store.len(), 1);
        assert!(store.snapshot()[0].contains("LOG no brackets here"));
    }

    #[test]
    fn test_clear_erases_snapshot() {
        let (store, session) = store();
        store.append_text(Level::Log, "x");
        assert!(session.get_item(SNAPSHOT_KEY).is_some());

        store.clear();
        assert!(store.is_empty());
        assert!(session.get_item(SNAPSHOT_KEY).is_none());
    }

    #[test]
    fn test_quota_failure_keeps_logging_in_memory() {
        let session = Arc::new(MemorySessionStore::with_quota(8));
        let store = LogStore::new(session);

        store.append_text(Level::Log, "a message far larger than the quota");
        store.append_text(Level::Log, "another");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_render_sink_notified() {
        struct Counting(Mutex<Vec<usize>>);
        impl RenderSink for Counting {
            fn logs_updated(&self, lines: &[String]) {
                self.0.lock().push(lines.len());
            }
        }

        let (store, _) = store();
        let sink = Arc::new(Counting(Mutex::new(Vec::new())));
        store.set_render_sink(sink.clone());

        store.append_text(Level::Log, "x");
        store.append_text(Level::Log, "y");
        store.clear();
        assert_eq!(*sink.0.lock(), vec![1, 2, 0]);
    }

    #[test]
    fn test_entry_parse_recovers_level() {
        let entry = LogEntry::parse("[12:34:56.789] FETCH_FAIL GET 3ms url=/x");
        assert_eq!(entry.level, Level::FetchFail);
        assert_eq!(entry.message, "GET 3ms url=/x");
    }
}
