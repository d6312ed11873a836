//! One-shot activation decision.
//!
//! Evaluated exactly once per page load. Two sources of truth: an ephemeral
//! query signal on the page location and a persisted preference that survives
//! reloads. The query signal never persists; only the explicit enable/disable
//! operations on the control surface do.

use crate::session::SessionStore;
use url::Url;

/// Query parameter activating the agent for the current load.
pub const QUERY_PARAM: &str = "debug";

/// Session key holding the persisted activation preference.
pub const PREF_KEY: &str = "debug_enabled";

pub struct ActivationGate;

impl ActivationGate {
    /// Whether the agent should install for this load.
    pub fn decide(page_url: &Url, session: &dyn SessionStore) -> bool {
        Self::query_signal(page_url) || Self::persisted_preference(session)
    }

    /// `?debug` present and not explicitly negated.
    pub fn query_signal(page_url: &Url) -> bool {
        page_url
            .query_pairs()
            .any(|(key, value)| key == QUERY_PARAM && truthy(&value))
    }

    /// Persisted preference set by a previous `enable()`.
    pub fn persisted_preference(session: &dyn SessionStore) -> bool {
        session.get_item(PREF_KEY).is_some_and(|value| truthy(&value))
    }
}

// A bare `?debug` counts as on; only explicit negation turns it off.
fn truthy(value: &str) -> bool {
    !matches!(value, "0" | "false" | "off")
}
