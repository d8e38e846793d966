//! Cache-aside layer over a string-keyed key-value store.
//!
//! Reads check the store first and return immediately on a hit. On a miss
//! the caller's fetch runs, and its result is written back with the TTL of
//! the key's [`CacheKind`]. Store failures on either side are logged and
//! treated as a miss or a skipped write; they never fail the request.

pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod single_flight;

pub use keys::{CacheKey, CacheKind};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use single_flight::SingleFlight;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

fn record_lookup(kind: CacheKind, outcome: &'static str) {
    metrics::counter!(
        "cache_lookups_total",
        "kind" => kind.label(),
        "outcome" => outcome
    )
    .increment(1);
}

#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn KeyValueStore>,
    flights: Option<SingleFlight>,
}

impl CacheLayer {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, single_flight: bool) -> Self {
        Self {
            store,
            flights: single_flight.then(SingleFlight::new),
        }
    }

    /// Returns the cached value, or `None` on a miss, an undecodable entry,
    /// or a store failure.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let rendered = key.to_string();

        match self.store.get(&rendered).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    debug!(key = %rendered, "Cache hit");
                    record_lookup(key.kind(), "hit");
                    Some(value)
                }
                Err(e) => {
                    warn!(key = %rendered, error = %e, "Discarding undecodable cache entry");
                    record_lookup(key.kind(), "error");
                    None
                }
            },
            Ok(None) => {
                record_lookup(key.kind(), "miss");
                None
            }
            Err(e) => {
                warn!(key = %rendered, error = %e, "Cache lookup failed");
                record_lookup(key.kind(), "error");
                None
            }
        }
    }

    /// Best-effort write with the key's TTL.
    pub async fn store<T: Serialize + Sync>(&self, key: &CacheKey, value: &T) {
        let rendered = key.to_string();

        let result = match serde_json::to_string(value) {
            Ok(json) => self.store.set(&rendered, json, key.ttl()).await,
            Err(e) => Err(CacheError::from(e)),
        };

        if let Err(e) = result {
            warn!(key = %rendered, error = %e, "Failed to populate cache");
        }
    }

    /// Cache-aside read: hit short-circuits, miss runs `fetch` and stores its
    /// result. With single-flight enabled concurrent misses on one key wait
    /// for the first fetch and then read its cached result.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        if let Some(hit) = self.lookup(key).await {
            return Ok(hit);
        }

        let _guard = match &self.flights {
            Some(flights) => {
                let guard = flights.acquire(&key.to_string()).await;
                if let Some(hit) = self.lookup(key).await {
                    return Ok(hit);
                }
                Some(guard)
            }
            None => None,
        };

        let value = fetch().await?;
        self.store(key, &value).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Provider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct BrokenStore;

    #[async_trait::async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".into()))
        }
    }

    fn key() -> CacheKey {
        CacheKey::Anime {
            provider: Provider::Anilibria,
            id: "1".into(),
        }
    }

    #[tokio::test]
    async fn test_hit_skips_fetch() {
        let cache = CacheLayer::new(Arc::new(MemoryStore::new()), false);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Result<Vec<i32>, ()> = cache
                .get_or_fetch(&key(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2, 3])
                })
                .await;
            assert_eq!(value.unwrap(), [1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hit_returns_the_stored_bytes() {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheLayer::new(store.clone(), false);
        let original = serde_json::json!({
            "id": "9000",
            "title": "Sousou no Frieren",
            "genres": ["Adventure", "Fantasy"],
            "year": 2023
        });

        let missed: serde_json::Value = cache
            .get_or_fetch(&key(), || async { Ok::<_, ()>(original.clone()) })
            .await
            .unwrap();
        let stored = store.get(&key().to_string()).await.unwrap().unwrap();

        let hit: serde_json::Value = cache
            .get_or_fetch(&key(), || async { Err(()) })
            .await
            .unwrap();

        assert_eq!(serde_json::to_string(&missed).unwrap(), stored);
        assert_eq!(serde_json::to_string(&hit).unwrap(), stored);
        assert_eq!(hit, original);
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = CacheLayer::new(Arc::new(MemoryStore::new()), true);

        let first: Result<i32, &str> = cache.get_or_fetch(&key(), || async { Err("down") }).await;
        assert_eq!(first, Err("down"));

        let second: Result<i32, &str> = cache.get_or_fetch(&key(), || async { Ok(7) }).await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn test_broken_store_still_serves_fetch() {
        let cache = CacheLayer::new(Arc::new(BrokenStore), true);

        let value: Result<String, ()> = cache
            .get_or_fetch(&key(), || async { Ok("fresh".to_string()) })
            .await;
        assert_eq!(value.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(&key().to_string(), "not json".into(), Duration::from_secs(60))
            .await
            .unwrap();
        let cache = CacheLayer::new(store, false);

        let value: Result<i32, ()> = cache.get_or_fetch(&key(), || async { Ok(5) }).await;
        assert_eq!(value.unwrap(), 5);
        assert_eq!(cache.lookup::<i32>(&key()).await, Some(5));
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache = CacheLayer::new(Arc::new(MemoryStore::new()), true);
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, ()>("shared".to_string())
        };

        let key = key();
        let (a, b) = tokio::join!(
            cache.get_or_fetch(&key, fetch),
            cache.get_or_fetch(&key, fetch)
        );

        assert_eq!(a.unwrap(), "shared");
        assert_eq!(b.unwrap(), "shared");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
