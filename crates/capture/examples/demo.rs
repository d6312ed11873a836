//! Wires the capture agent the way a host application would: activation via
//! the query signal, decorated console/history/transport capabilities, a
//! self-test probe, and a dump of the resulting log snapshot.

use capture::{
    CaptureAgent, Clipboard, ConsoleSink, HistoryApi, LogValue, MemorySessionStore, ReloadHandler,
    SessionHistory, StdConsole, Transport, UncaughtError,
};
use common::{AgentConfig, AgentError};
use net::{FetchRequest, HttpClient};
use std::sync::Arc;
use url::Url;

struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), AgentError> {
        Err(AgentError::clipboard("no clipboard in a headless demo"))
    }
}

struct NoReload;

impl ReloadHandler for NoReload {
    fn reload(&self) {
        tracing::info!("host would reload the page here");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let page = Url::parse("https://app.example.com/dashboard?debug=1")?;
    let transport: Arc<dyn Transport> = Arc::new(HttpClient::new()?);

    let agent = CaptureAgent::new(
        page,
        AgentConfig {
            api_base: None,
            blog_source: Some("blog-main".to_string()),
            docs_source: None,
            media_source: None,
        },
        Arc::new(MemorySessionStore::new()),
        transport.clone(),
        Arc::new(NoClipboard),
        Arc::new(NoReload),
    );
    agent.install();

    let console = agent.wrap_console(Arc::new(StdConsole));
    console.log(&["dashboard booted".into()]);
    console.warn(&["chart data incomplete".into(), LogValue::Structured(serde_json::json!({"rows": 0}))]);

    let history = agent.wrap_history(Arc::new(SessionHistory::new()));
    history.push_state(None, "", Some("/projects"));
    history.replace_state(None, "", Some("/projects/42"));

    if let Some(monitor) = agent.error_monitor() {
        monitor.on_uncaught(&UncaughtError {
            message: "example uncaught".to_string(),
            location: None,
        });
    }

    // Goes through the decorated transport: logged as FETCH/FETCH_FAIL.
    let wrapped = agent.wrap_transport(transport);
    let _ = wrapped
        .fetch(FetchRequest::new("https://app.example.com/api/projects"))
        .await;

    // Goes through the original transport: logged only as TEST.
    agent.self_test().await;

    // Fails against NoClipboard and falls back to the captured console.
    agent.copy_to_clipboard();

    println!("--- captured log ---");
    for line in agent.snapshot() {
        println!("{line}");
    }
    Ok(())
}
