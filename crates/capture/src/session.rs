//! Session-scoped key/value persistence.
//!
//! Backend for the persisted log snapshot and the activation preference.
//! Writes are best-effort from the agent's point of view: a failed write is
//! reported as an error the caller may deliberately discard.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("Quota exceeded")]
    QuotaExceeded,
    #[error("Storage is disabled")]
    Disabled,
}

/// Session-scoped storage capability.
pub trait SessionStore: Send + Sync {
    /// Get the value for the given key.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Set a value for the given key.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value for the given key.
    fn remove_item(&self, key: &str);
}

/// Memory-backed session store with a byte quota.
#[derive(Debug)]
pub struct MemorySessionStore {
    data: RwLock<HashMap<String, String>>,
    quota: usize,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Create a store with the default quota (5MB).
    pub fn new() -> Self {
        Self::with_quota(5 * 1024 * 1024)
    }

    /// Create with custom quota.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            quota,
        }
    }

    fn usage(data: &HashMap<String, String>) -> usize {
        data.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self.data.write();
        let existing = data.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
        let new_size = Self::usage(&data) - existing + key.len() + value.len();
        if new_size > self.quota {
            return Err(StorageError::QuotaExceeded);
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.data.write().remove(key);
    }
}
