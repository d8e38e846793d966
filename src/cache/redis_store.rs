use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

use super::{CacheError, KeyValueStore};

/// Redis-backed store using `GET` / `SETEX`.
///
/// The connection manager is created on first use and reconnects on its own,
/// so a Redis outage at startup only turns lookups into misses.
pub struct RedisStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStore {
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Backend(format!("Invalid Redis URL: {e}")))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let manager = self.client.get_connection_manager().await?;
                info!("Connected to Redis");
                Ok::<_, redis::RedisError>(manager)
            })
            .await
            .map_err(|e| CacheError::Backend(format!("Redis connection failed: {e}")))?;

        Ok(manager.clone())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;

        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::Backend(format!("Failed to get from cache: {e}")))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;

        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Backend(format!("Failed to set cache: {e}")))
    }
}
