//! HTTP client implementation.

use crate::request::FetchRequest;
use crate::response::FetchResponse;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// HTTP client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timeout")]
    Timeout,
    #[error("Request error: {0}")]
    Request(String),
    #[error("Response error: {0}")]
    Response(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Maximum redirects.
    pub max_redirects: u32,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 20,
            user_agent: format!("CaptureAgent/1.0 ({})", std::env::consts::OS),
        }
    }
}

/// HTTP client for making requests.
pub struct HttpClient {
    /// Inner reqwest client.
    inner: reqwest::Client,
    /// Client configuration.
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Execute a request.
    pub async fn execute(&self, request: FetchRequest) -> Result<FetchResponse, ClientError> {
        let method: reqwest::Method = request
            .method
            .parse()
            .map_err(|_| ClientError::Request(format!("invalid method {}", request.method)))?;

        let url: url::Url = request
            .url
            .parse()
            .map_err(|_| ClientError::InvalidUrl(request.url.clone()))?;

        tracing::debug!(method = %request.method, url = %url, "executing request");
        let mut builder = self.inner.request(method, url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cache_control) = request.cache.cache_control() {
            builder = builder.header("Cache-Control", cache_control);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else if e.is_connect() {
                ClientError::Connection(e.to_string())
            } else {
                ClientError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        let final_url = response.url().clone();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_string(), v.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Response(e.to_string()))?;

        // reqwest follows redirects internally; a changed effective URL is the
        // only trace left of them.
        let redirected = final_url != url;

        Ok(FetchResponse {
            url: final_url.to_string(),
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body: body.to_vec(),
            redirected,
        })
    }

    /// Get client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
