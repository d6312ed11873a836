//! HTTP request model.

use std::collections::HashMap;

/// An outbound request as seen by the fetch interceptor.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    /// Request URL (possibly relative; resolved by the transport).
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Credentials mode.
    pub credentials: CredentialsMode,
    /// Cache mode.
    pub cache: CacheMode,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: None,
            credentials: CredentialsMode::Default,
            cache: CacheMode::Default,
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }
}

/// Credentials mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialsMode {
    #[default]
    Default,
    Omit,
    SameOrigin,
    Include,
}

impl CredentialsMode {
    /// Wire-format name, as it appears in log entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsMode::Default => "default",
            CredentialsMode::Omit => "omit",
            CredentialsMode::SameOrigin => "same-origin",
            CredentialsMode::Include => "include",
        }
    }
}

/// Cache mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    #[default]
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl CacheMode {
    /// Cache-Control header value implied by this mode, if any.
    pub fn cache_control(&self) -> Option<&'static str> {
        match self {
            CacheMode::Default | CacheMode::ForceCache | CacheMode::OnlyIfCached => None,
            CacheMode::NoStore => Some("no-store"),
            CacheMode::Reload | CacheMode::NoCache => Some("no-cache"),
        }
    }
}
