//! Legacy-request instrumentation.
//!
//! Models the open/send lifecycle of the legacy asynchronous request object.
//! Method and URL are instance-local state recorded at `open`, so concurrent
//! in-flight requests never cross-contaminate; `send` records the start time
//! and logs exactly one XHR entry when the request completes.

use crate::format::Level;
use crate::store::LogStore;
use async_trait::async_trait;
use net::{ClientError, FetchResponse};
use std::sync::Arc;
use std::time::Instant;

/// Backend executing the request once `send` is called.
#[async_trait]
pub trait LegacyTransport: Send + Sync {
    async fn execute(
        &self,
        method: &str,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<FetchResponse, ClientError>;
}

/// One legacy request instance wrapped at the open/send seam.
pub struct LegacyRequest {
    transport: Arc<dyn LegacyTransport>,
    store: Option<LogStore>,
    method: Option<String>,
    url: Option<String>,
}

impl LegacyRequest {
    /// Uninstrumented request: pure delegation.
    pub fn new(transport: Arc<dyn LegacyTransport>) -> Self {
        Self {
            transport,
            store: None,
            method: None,
            url: None,
        }
    }

    /// Instrumented request: records one XHR entry per completed send.
    pub fn instrumented(transport: Arc<dyn LegacyTransport>, store: LogStore) -> Self {
        Self {
            transport,
            store: Some(store),
            method: None,
            url: None,
        }
    }

    /// Record method and URL for this instance.
    pub fn open(&mut self, method: &str, url: &str) {
        self.method = Some(method.to_string());
        self.url = Some(url.to_string());
    }

    /// Execute the request, yielding the backend's result unchanged. When
    /// instrumented, the terminal outcome is logged exactly once.
    pub async fn send(&mut self, body: Option<Vec<u8>>) -> Result<FetchResponse, ClientError> {
        let (Some(method), Some(url)) = (self.method.clone(), self.url.clone()) else {
            return Err(ClientError::Request("send() before open()".to_string()));
        };

        let started = Instant::now();
        let result = self.transport.execute(&method, &url, body).await;

        if let Some(store) = &self.store {
            match &result {
                Ok(response) => store.append_text(
                    Level::Xhr,
                    format!(
                        "{} {} {}ms url={}",
                        method,
                        response.status,
                        started.elapsed().as_millis(),
                        url
                    ),
                ),
                Err(err) => store.append_text(
                    Level::Xhr,
                    format!(
                        "{} failed {}ms url={} error={}",
                        method,
                        started.elapsed().as_millis(),
                        url,
                        err
                    ),
                ),
            }
        }

        result
    }
}
