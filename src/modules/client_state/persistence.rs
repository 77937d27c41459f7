use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Persistence hook for client-state stores.
///
/// Mirrors the local-storage contract: string keys, JSON string payloads of
/// the form `{"items":[...]}`. Writes are best-effort; a failing backend
/// must not take the in-memory collection down with it, so implementations
/// log and swallow their own errors.
pub trait StatePersistence: Send {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, payload: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory persistence backend. The map is shared behind an `Arc` so a
/// test (or an embedding application) can keep a handle and observe what
/// the stores persisted, the way separate scripts share one localStorage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatePersistence for InMemoryPersistence {
    fn load(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::warn!("client-state load failed for '{}': {}", key, e);
                None
            }
        }
    }

    fn save(&mut self, key: &str, payload: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), payload.to_string());
            }
            Err(e) => tracing::warn!("client-state save failed for '{}': {}", key, e),
        }
    }

    fn remove(&mut self, key: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
            }
            Err(e) => tracing::warn!("client-state remove failed for '{}': {}", key, e),
        }
    }
}
