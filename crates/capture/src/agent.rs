//! Capture agent lifecycle and control surface.
//!
//! One process-wide agent instance owns the log store and hands out
//! decorated capabilities. The activation decision is made once at
//! construction; when inactive the agent is inert and the wrap helpers
//! return the original capabilities untouched.

use crate::console::{ConsoleSink, InstrumentedConsole};
use crate::errors::ErrorMonitor;
use crate::fetch::{InstrumentedTransport, Transport};
use crate::format::{Level, LogValue};
use crate::gate::{ActivationGate, PREF_KEY};
use crate::nav::{HistoryApi, InstrumentedHistory, PopStateObserver};
use crate::session::SessionStore;
use crate::store::{LogStore, RenderSink};
use crate::xhr::{LegacyRequest, LegacyTransport};
use common::AgentConfig;
use net::{CacheMode, FetchRequest};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Same-origin diagnostic endpoint probed by the self-test.
pub const SELF_TEST_PATH: &str = "/api/auth/me";

/// Maximum number of response-body characters surfaced by the self-test.
const BODY_PREVIEW_CHARS: usize = 120;

/// System clipboard capability.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), common::AgentError>;
}

/// Forces a full page reload so the activation gate re-evaluates from
/// persisted state.
pub trait ReloadHandler: Send + Sync {
    fn reload(&self);
}

/// Process-wide capture agent handle. Cheap to clone; all clones share one
/// store and one installation state.
#[derive(Clone)]
pub struct CaptureAgent {
    inner: Arc<AgentInner>,
}

struct AgentInner {
    store: LogStore,
    session: Arc<dyn SessionStore>,
    /// The original, uninstrumented transport. The self-test probes through
    /// this handle so a logical probe never produces a duplicate FETCH entry.
    transport: Arc<dyn Transport>,
    clipboard: Arc<dyn Clipboard>,
    reload: Arc<dyn ReloadHandler>,
    config: AgentConfig,
    page_url: Url,
    console: RwLock<Option<Arc<dyn ConsoleSink>>>,
    enabled: bool,
    installed: AtomicBool,
}

impl CaptureAgent {
    pub fn new(
        page_url: Url,
        config: AgentConfig,
        session: Arc<dyn SessionStore>,
        transport: Arc<dyn Transport>,
        clipboard: Arc<dyn Clipboard>,
        reload: Arc<dyn ReloadHandler>,
    ) -> Self {
        let enabled = ActivationGate::decide(&page_url, session.as_ref());
        let store = LogStore::new(session.clone());
        Self {
            inner: Arc::new(AgentInner {
                store,
                session,
                transport,
                clipboard,
                reload,
                config,
                page_url,
                console: RwLock::new(None),
                enabled,
                installed: AtomicBool::new(false),
            }),
        }
    }

    /// Whether the activation gate decided Active for this load.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled
    }

    /// Activate: reload the persisted snapshot and write the initial
    /// metadata and enabled-marker entries. Idempotent; a second call in the
    /// same process is a no-op. Does nothing when the gate decided Inactive.
    pub fn install(&self) {
        if !self.inner.enabled {
            return;
        }
        if self.inner.installed.swap(true, Ordering::SeqCst) {
            tracing::debug!("capture agent already installed");
            return;
        }
        self.inner.store.load();
        self.meta();
        self.inner.store.append_text(Level::Info, "capture agent enabled");
    }

    /// Decorate the console capability. Returns the original unchanged when
    /// inactive. The decorated handle is retained for the clipboard
    /// fallback dump.
    pub fn wrap_console(&self, sink: Arc<dyn ConsoleSink>) -> Arc<dyn ConsoleSink> {
        if !self.inner.enabled {
            return sink;
        }
        let wrapped: Arc<dyn ConsoleSink> =
            Arc::new(InstrumentedConsole::new(sink, self.inner.store.clone()));
        *self.inner.console.write() = Some(wrapped.clone());
        wrapped
    }

    /// Decorate the network-request capability.
    pub fn wrap_transport(&self, transport: Arc<dyn Transport>) -> Arc<dyn Transport> {
        if !self.inner.enabled {
            return transport;
        }
        Arc::new(InstrumentedTransport::new(transport, self.inner.store.clone()))
    }

    /// Decorate the history-mutation capability.
    pub fn wrap_history(&self, history: Arc<dyn HistoryApi>) -> Arc<dyn HistoryApi> {
        if !self.inner.enabled {
            return history;
        }
        Arc::new(InstrumentedHistory::new(history, self.inner.store.clone()))
    }

    /// Subscriber for the global error/rejection signals. None when
    /// inactive: nothing to subscribe.
    pub fn error_monitor(&self) -> Option<ErrorMonitor> {
        self.inner
            .enabled
            .then(|| ErrorMonitor::new(self.inner.store.clone()))
    }

    /// Observer for the back/forward navigation signal.
    pub fn pop_state_observer(&self) -> Option<PopStateObserver> {
        self.inner
            .enabled
            .then(|| PopStateObserver::new(self.inner.store.clone()))
    }

    /// Create a legacy request over the given backend, instrumented only
    /// when active.
    pub fn legacy_request(&self, backend: Arc<dyn LegacyTransport>) -> LegacyRequest {
        if self.inner.enabled {
            LegacyRequest::instrumented(backend, self.inner.store.clone())
        } else {
            LegacyRequest::new(backend)
        }
    }

    /// Persist the activation preference and force a reload.
    pub fn enable(&self) {
        if let Err(err) = self.inner.session.set_item(PREF_KEY, "1") {
            tracing::debug!(%err, "failed to persist activation preference");
        }
        self.inner.reload.reload();
    }

    /// Clear the activation preference and force a reload. Interceptors stay
    /// installed until the reload; there is no in-process teardown.
    pub fn disable(&self) {
        self.inner.session.remove_item(PREF_KEY);
        self.inner.reload.reload();
    }

    /// Recompute and append the environment metadata entry. Callable
    /// repeatedly.
    pub fn meta(&self) {
        let mut parts = vec![
            format!("host={}", self.inner.page_url.host_str().unwrap_or("-")),
            format!("path={}", self.inner.page_url.path()),
        ];
        for (name, value) in self.inner.config.named_values() {
            parts.push(format!("{}={}", name, value.unwrap_or("-")));
        }
        self.inner.store.append_text(Level::Meta, parts.join(" "));
    }

    /// One-shot probe of the diagnostic endpoint with no-cache semantics,
    /// issued through the original transport. Logs the intent, then the
    /// status and a bounded body preview, or the failure.
    pub async fn self_test(&self) {
        let url = if self.inner.config.api_base.is_some() {
            self.inner.config.api_url(SELF_TEST_PATH)
        } else {
            self.inner
                .page_url
                .join(SELF_TEST_PATH)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| SELF_TEST_PATH.to_string())
        };

        self.inner.store.append_text(Level::Test, format!("GET {url}"));

        let request = FetchRequest::new(&url).cache(CacheMode::NoCache);
        match self.inner.transport.fetch(request).await {
            Ok(response) => {
                let preview: String = response.text().chars().take(BODY_PREVIEW_CHARS).collect();
                self.inner.store.append_text(
                    Level::Test,
                    format!("status={} body={}", response.status, preview),
                );
            }
            Err(err) => {
                self.inner
                    .store
                    .append_text(Level::Test, format!("failed: {err}"));
            }
        }
    }

    /// Serialize the snapshot to the system clipboard. On failure, log a
    /// warning and dump the text through the console relay instead; the
    /// relay is itself captured, which makes the fallback visible.
    pub fn copy_to_clipboard(&self) {
        let text = self.inner.store.snapshot_text();
        if let Err(err) = self.inner.clipboard.write_text(&text) {
            self.inner
                .store
                .append_text(Level::Warn, format!("clipboard write failed: {err}"));
            let console = self.inner.console.read().clone();
            if let Some(console) = console {
                console.log(&[LogValue::Text(text)]);
            }
        }
    }

    /// Empty the store and erase the persisted snapshot.
    pub fn clear(&self) {
        self.inner.store.clear();
    }

    /// Current log lines for the external panel.
    pub fn snapshot(&self) -> Vec<String> {
        self.inner.store.snapshot()
    }

    /// Attach the external render sink.
    pub fn set_render_sink(&self, sink: Arc<dyn RenderSink>) {
        self.inner.store.set_render_sink(sink);
    }

    /// Shared store handle, for wiring interceptors constructed elsewhere.
    pub fn store(&self) -> LogStore {
        self.inner.store.clone()
    }
}
