//! HTTP response model.

use std::collections::HashMap;

/// A completed response as seen by the fetch interceptor.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    /// Effective URL (after redirects).
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
    /// Whether the response was the result of a redirect.
    pub redirected: bool,
}

impl FetchResponse {
    /// Check if the response was successful (status 200-299).
    pub fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Get the response body as text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Get the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
