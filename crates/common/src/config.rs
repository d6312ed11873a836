//! Agent configuration.
//!
//! The capture agent reads a handful of page-wide configuration values when it
//! writes its environment metadata entry: the API base URL and the three
//! content-source identifiers the dashboard is wired to.

use serde::{Deserialize, Serialize};

/// Configuration values surfaced in the metadata entry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Base URL prepended to relative API paths.
    pub api_base: Option<String>,
    /// Blog content-source identifier.
    pub blog_source: Option<String>,
    /// Docs content-source identifier.
    pub docs_source: Option<String>,
    /// Media content-source identifier.
    pub media_source: Option<String>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Named configuration values in metadata order.
    pub fn named_values(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("API_BASE", self.api_base.as_deref()),
            ("BLOG_SOURCE", self.blog_source.as_deref()),
            ("DOCS_SOURCE", self.docs_source.as_deref()),
            ("MEDIA_SOURCE", self.media_source.as_deref()),
        ]
    }

    /// Resolve a relative API path against the configured base.
    pub fn api_url(&self, path: &str) -> String {
        match self.api_base.as_deref() {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_with_base() {
        let config = AgentConfig {
            api_base: Some("https://api.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.api_url("/api/auth/me"),
            "https://api.example.com/api/auth/me"
        );
    }

    #[test]
    fn test_api_url_without_base() {
        let config = AgentConfig::new();
        assert_eq!(config.api_url("/api/auth/me"), "/api/auth/me");
    }

    #[test]
    fn test_named_values_order() {
        let config = AgentConfig {
            blog_source: Some("b1".to_string()),
            ..Default::default()
        };
        let values = config.named_values();
        assert_eq!(values[0].0, "API_BASE");
        assert_eq!(values[1], ("BLOG_SOURCE", Some("b1")));
    }
}
