//! SPA navigation capture.
//!
//! The two history-mutation entry points are wrapped; back/forward traversal
//! is only observed. The decorator logs the target location before
//! delegating, preserving the exact argument list.

use crate::format::Level;
use crate::store::LogStore;
use parking_lot::RwLock;
use std::sync::Arc;

/// History-mutation capability as the host application sees it.
pub trait HistoryApi: Send + Sync {
    /// Push a new entry onto the history stack.
    fn push_state(&self, state: Option<serde_json::Value>, title: &str, url: Option<&str>);

    /// Replace the current entry.
    fn replace_state(&self, state: Option<serde_json::Value>, title: &str, url: Option<&str>);
}

/// A single history entry.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub state: Option<serde_json::Value>,
    pub title: String,
    pub url: String,
}

/// In-process history stack.
pub struct SessionHistory {
    inner: RwLock<HistoryState>,
}

struct HistoryState {
    entries: Vec<HistoryEntry>,
    current_index: usize,
    max_length: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HistoryState {
                entries: Vec::new(),
                current_index: 0,
                max_length: 50, // Typical browser limit
            }),
        }
    }

    pub fn length(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// URL of the current entry.
    pub fn current_url(&self) -> Option<String> {
        let state = self.inner.read();
        state.entries.get(state.current_index).map(|e| e.url.clone())
    }

    /// Move back one entry, returning the restored URL.
    pub fn back(&self) -> Option<String> {
        let mut state = self.inner.write();
        if state.current_index > 0 {
            state.current_index -= 1;
            state.entries.get(state.current_index).map(|e| e.url.clone())
        } else {
            None
        }
    }

    /// Move forward one entry, returning the restored URL.
    pub fn forward(&self) -> Option<String> {
        let mut state = self.inner.write();
        if state.current_index + 1 < state.entries.len() {
            state.current_index += 1;
            state.entries.get(state.current_index).map(|e| e.url.clone())
        } else {
            None
        }
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryApi for SessionHistory {
    fn push_state(&self, state: Option<serde_json::Value>, title: &str, url: Option<&str>) {
        let mut history = self.inner.write();

        // Pushing truncates any forward history.
        let keep = history.current_index + 1;
        if history.entries.len() > keep {
            history.entries.truncate(keep);
        }

        history.entries.push(HistoryEntry {
            state,
            title: title.to_string(),
            url: url.unwrap_or_default().to_string(),
        });
        history.current_index = history.entries.len() - 1;

        if history.entries.len() > history.max_length {
            history.entries.remove(0);
            history.current_index = history.current_index.saturating_sub(1);
        }
    }

    fn replace_state(&self, state: Option<serde_json::Value>, title: &str, url: Option<&str>) {
        let mut history = self.inner.write();
        let index = history.current_index;
        if let Some(entry) = history.entries.get_mut(index) {
            entry.state = state;
            entry.title = title.to_string();
            if let Some(url) = url {
                entry.url = url.to_string();
            }
        }
    }
}

/// Decorator logging the target location before delegating.
pub struct InstrumentedHistory {
    inner: Arc<dyn HistoryApi>,
    store: LogStore,
}

impl InstrumentedHistory {
    pub fn new(inner: Arc<dyn HistoryApi>, store: LogStore) -> Self {
        Self { inner, store }
    }
}

impl HistoryApi for InstrumentedHistory {
    fn push_state(&self, state: Option<serde_json::Value>, title: &str, url: Option<&str>) {
        self.store
            .append_text(Level::Nav, format!("push {}", url.unwrap_or("(current)")));
        self.inner.push_state(state, title, url);
    }

    fn replace_state(&self, state: Option<serde_json::Value>, title: &str, url: Option<&str>) {
        self.store
            .append_text(Level::Nav, format!("replace {}", url.unwrap_or("(current)")));
        self.inner.replace_state(state, title, url);
    }
}

/// Read-only observer for the back/forward navigation signal.
#[derive(Clone)]
pub struct PopStateObserver {
    store: LogStore,
}

impl PopStateObserver {
    pub fn new(store: LogStore) -> Self {
        Self { store }
    }

    /// Log the location restored by a back/forward traversal.
    pub fn on_pop_state(&self, location: &str) {
        self.store.append_text(Level::Nav, format!("pop {location}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn instrumented() -> (InstrumentedHistory, Arc<SessionHistory>, LogStore) {
        let store = LogStore::new(Arc::new(MemorySessionStore::new()));
        let history = Arc::new(SessionHistory::new());
        let wrapped = InstrumentedHistory::new(history.clone(), store.clone());
        (wrapped, history, store)
    }

    #[test]
    fn test_push_logged_before_location_updates() {
        let (wrapped, history, store) = instrumented();
        wrapped.push_state(None, "", Some("/x"));

        let lines = store.snapshot();
        assert!(lines[0].contains("NAV push /x"));
        assert_eq!(history.current_url().as_deref(), Some("/x"));
    }

    #[test]
    fn test_replace_preserves_arguments() {
        let (wrapped, history, store) = instrumented();
        wrapped.push_state(Some(json!({"page": 1})), "One", Some("/one"));
        wrapped.replace_state(Some(json!({"page": 2})), "Two", Some("/two"));

        assert_eq!(history.length(), 1);
        assert_eq!(history.current_url().as_deref(), Some("/two"));
        assert!(store.snapshot()[1].contains("NAV replace /two"));
    }

    #[test]
    fn test_forward_history_truncated() {
        let (wrapped, history, _) = instrumented();
        wrapped.push_state(None, "", Some("/1"));
        wrapped.push_state(None, "", Some("/2"));
        wrapped.push_state(None, "", Some("/3"));

        history.back();
        history.back();
        wrapped.push_state(None, "", Some("/new"));

        assert_eq!(history.length(), 2);
        assert_eq!(history.current_url().as_deref(), Some("/new"));
    }

    #[test]
    fn test_pop_state_logged() {
        let store = LogStore::new(Arc::new(MemorySessionStore::new()));
        let observer = PopStateObserver::new(store.clone());
        observer.on_pop_state("/back-here");
        assert!(store.snapshot()[0].contains("NAV pop /back-here"));
    }
}
