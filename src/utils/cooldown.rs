use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-wide keyed timestamp store with a bounded TTL. Entries expire
/// logically by timestamp comparison and are purged whenever the map is
/// touched, so no explicit teardown is needed.
pub struct CooldownMap {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
    ttl: Duration,
}

impl CooldownMap {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Records `key` as active and returns true, or returns false when the
    /// key was touched within the TTL. A zero TTL disables the cooldown.
    pub async fn try_begin(&self, key: &str) -> bool {
        if self.ttl.is_zero() {
            return true;
        }

        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, touched| now - *touched < self.ttl);

        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_string(), now);
        true
    }

    /// Drops the entry for `key` so the next `try_begin` succeeds. Called
    /// when the guarded work fails and must stay retryable.
    pub async fn release(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }
}
