//! Client-side diagnostic capture agent.
//!
//! A self-activating instrumentation layer that records console output,
//! uncaught errors, SPA navigation, and outbound network calls into a
//! bounded, session-persisted log without altering the behavior of the code
//! it observes. Instrumentation is expressed as decorators: each interceptor
//! takes the original capability (console sink, transport, history) and
//! returns a value of the identical interface with logging composed in.
//!
//! The one hard rule is the transparency contract: a wrapped capability must
//! return identical results and raise identical errors for every input. The
//! agent is allowed to fail silently; the host application is never allowed
//! to fail because of the agent.

pub mod agent;
pub mod console;
pub mod errors;
pub mod fetch;
pub mod format;
pub mod gate;
pub mod nav;
pub mod session;
pub mod store;
pub mod xhr;

pub use agent::{CaptureAgent, Clipboard, ReloadHandler};
pub use console::{ConsoleSink, InstrumentedConsole, StdConsole};
pub use errors::{ErrorMonitor, SourceLocation, UncaughtError};
pub use fetch::{InstrumentedTransport, Transport};
pub use format::{Level, LogValue};
pub use gate::ActivationGate;
pub use nav::{HistoryApi, InstrumentedHistory, PopStateObserver, SessionHistory};
pub use session::{MemorySessionStore, SessionStore, StorageError};
pub use store::{LogEntry, LogStore, RenderSink, MAX_ENTRIES};
pub use xhr::{LegacyRequest, LegacyTransport};
