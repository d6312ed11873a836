//! Fetch instrumentation.
//!
//! Wraps the network-request capability. Exactly one terminal entry is
//! recorded per call: FETCH on success, FETCH_FAIL on failure, and the
//! original response or error is passed through unchanged.

use crate::format::Level;
use crate::store::LogStore;
use async_trait::async_trait;
use net::{ClientError, FetchRequest, FetchResponse, HttpClient};
use std::sync::Arc;
use std::time::Instant;

/// Network-request capability as the host application sees it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ClientError>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ClientError> {
        self.execute(request).await
    }
}

/// Decorator timing each request and recording its terminal outcome.
pub struct InstrumentedTransport {
    inner: Arc<dyn Transport>,
    store: LogStore,
}

impl InstrumentedTransport {
    pub fn new(inner: Arc<dyn Transport>, store: LogStore) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl Transport for InstrumentedTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ClientError> {
        let method = if request.method.is_empty() {
            "GET".to_string()
        } else {
            request.method.clone()
        };
        let credentials = request.credentials.as_str();
        let url = request.url.clone();
        let started = Instant::now();

        match self.inner.fetch(request).await {
            Ok(response) => {
                self.store.append_text(
                    Level::Fetch,
                    format!(
                        "{} {} {}ms cred={} url={} redirected={}",
                        method,
                        response.status,
                        started.elapsed().as_millis(),
                        credentials,
                        response.url,
                        response.redirected
                    ),
                );
                Ok(response)
            }
            Err(err) => {
                self.store.append_text(
                    Level::FetchFail,
                    format!(
                        "{} {}ms cred={} url={} error={}",
                        method,
                        started.elapsed().as_millis(),
                        credentials,
                        url,
                        err
                    ),
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use net::CredentialsMode;
    use std::collections::HashMap;
    use std::time::Duration;

    /// Mock transport with a configurable delay and outcome.
    pub(crate) struct MockTransport {
        pub status: u16,
        pub delay: Duration,
        pub fail: bool,
        pub redirected: bool,
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self {
                status: 200,
                delay: Duration::ZERO,
                fail: false,
                redirected: false,
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, ClientError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(ClientError::Connection("connection refused".to_string()));
            }
            Ok(FetchResponse {
                url: request.url,
                status: self.status,
                status_text: String::new(),
                headers: HashMap::new(),
                body: b"{}".to_vec(),
                redirected: self.redirected,
            })
        }
    }

    fn wrap(mock: MockTransport) -> (InstrumentedTransport, LogStore) {
        let store = LogStore::new(Arc::new(MemorySessionStore::new()));
        (
            InstrumentedTransport::new(Arc::new(mock), store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn test_success_logged_with_timing() {
        let (transport, store) = wrap(MockTransport {
            delay: Duration::from_millis(50),
            ..Default::default()
        });

        let response = transport.fetch(FetchRequest::new("/api/data")).await.unwrap();
        assert_eq!(response.status, 200);

        let lines = store.snapshot();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.contains("FETCH GET 200"));
        assert!(line.contains("cred=default"));
        assert!(line.contains("url=/api/data"));
        assert!(line.contains("redirected=false"));
        let duration = line
            .split_whitespace()
            .find(|token| token.ends_with("ms"))
            .unwrap();
        assert!(duration.trim_end_matches("ms").parse::<u64>().unwrap() >= 50);
    }

    #[tokio::test]
    async fn test_failure_reraises_identical_error() {
        let (transport, store) = wrap(MockTransport {
            fail: true,
            ..Default::default()
        });

        let err = transport
            .fetch(FetchRequest::new("https://api.example.com/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));

        let lines = store.snapshot();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("FETCH_FAIL GET"));
        assert!(lines[0].contains("url=https://api.example.com/x"));
        assert!(lines[0].contains("error=Connection error: connection refused"));
    }

    #[tokio::test]
    async fn test_entry_exists_before_caller_observes_rejection() {
        // The FETCH_FAIL entry is appended before the error value is
        // returned, so by the time the caller can match on it the store
        // already holds exactly one terminal entry.
        let (transport, store) = wrap(MockTransport {
            fail: true,
            ..Default::default()
        });

        let result = transport.fetch(FetchRequest::new("/x")).await;
        assert_eq!(store.len(), 1);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_response_passed_through_unchanged() {
        let (transport, _) = wrap(MockTransport {
            status: 418,
            redirected: true,
            ..Default::default()
        });

        let request = FetchRequest::new("/teapot")
            .method("POST")
            .credentials(CredentialsMode::Include);
        let response = transport.fetch(request).await.unwrap();
        assert_eq!(response.status, 418);
        assert!(response.redirected);
        assert_eq!(response.body, b"{}");
    }

    #[tokio::test]
    async fn test_completion_order_not_call_order() {
        let store = LogStore::new(Arc::new(MemorySessionStore::new()));
        let slow = InstrumentedTransport::new(
            Arc::new(MockTransport {
                delay: Duration::from_millis(80),
                ..Default::default()
            }),
            store.clone(),
        );
        let fast = InstrumentedTransport::new(
            Arc::new(MockTransport::default()),
            store.clone(),
        );

        let slow_call = slow.fetch(FetchRequest::new("/slow"));
        let fast_call = fast.fetch(FetchRequest::new("/fast"));
        let (slow_result, fast_result) = tokio::join!(slow_call, fast_call);
        assert!(slow_result.is_ok() && fast_result.is_ok());

        // The later-started fast request completed, and therefore logged,
        // first.
        let lines = store.snapshot();
        assert!(lines[0].contains("url=/fast"));
        assert!(lines[1].contains("url=/slow"));
    }
}
