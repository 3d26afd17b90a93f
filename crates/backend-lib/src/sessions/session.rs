// ============================
// crates/backend-lib/src/sessions/session.rs
// ============================
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Instant;

/// Per-client session state
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: Instant,
    values: RwLock<HashMap<String, String>>,
}

impl Session {
    pub(crate) fn new(id: String, created_at: Instant) -> Self {
        Self {
            id,
            created_at,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Opaque token this session is registered under
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creation instant; expiry is measured from here and never refreshed
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Value stored under `key`, or `None` if unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Insert or overwrite the value under `key`
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Remove the value under `key`, returning it
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }
}
