use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{CacheError, KeyValueStore};

/// Map size at which `set` starts dropping expired entries.
const SWEEP_THRESHOLD: usize = 512;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-process TTL map for single-node runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    /// Drops every expired entry first once the map reaches
    /// [`SWEEP_THRESHOLD`].
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, e| !e.expired(now));
        }

        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store
            .set("k", "v".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_misses() {
        let store = MemoryStore::new();
        store
            .set("k", "v".into(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_sweeps_unread_expired_keys() {
        let store = MemoryStore::new();
        for i in 0..1000 {
            store
                .set(&format!("search:{i}"), "[]".into(), Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        store
            .set("fresh", "[]".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.entries.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_small_map_keeps_live_entries() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store
                .set(&format!("k{i}"), "v".into(), Duration::from_secs(60))
                .await
                .unwrap();
        }
        assert_eq!(store.entries.read().await.len(), 10);
        assert_eq!(store.get("k3").await.unwrap().as_deref(), Some("v"));
    }
}
