//! Redis implementation of [`CacheStore`].

use ::redis::{AsyncCommands, Client, IntoConnectionInfo, aio::ConnectionManager};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::store::{CacheError, CacheStore};

/// Redis cache client with connection pooling.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connects to Redis and checks the server answers `PING`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Redis` if the connection info is invalid or the server is unreachable.
    pub async fn connect(info: impl IntoConnectionInfo) -> Result<Self, CacheError> {
        let client = Client::open(info)?;
        let conn = ConnectionManager::new(client).await?;
        let cache = Self { conn };

        let pong = cache.ping().await?;
        info!(reply = %pong, "Connected to Redis cache");

        Ok(cache)
    }

    pub async fn ping(&self) -> Result<String, CacheError> {
        let mut conn = self.conn.clone();
        let pong: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    async fn set(&self, key: &str, value: String) -> Result<String, CacheError> {
        let mut conn = self.conn.clone();
        let ack: String = conn.set(key, value).await?;

        debug!(cache.key = %key, "Cache set");

        Ok(ack)
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(key).await? {
            Some(value) => {
                debug!(cache.key = %key, "Cache hit");
                Ok(value)
            }
            None => {
                debug!(cache.key = %key, "Cache miss");
                Err(CacheError::Miss)
            }
        }
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn delete(&self, key: &str) -> Result<i64, CacheError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(key).await?;

        debug!(cache.key = %key, removed, "Cache delete");

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a running Redis instance

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_set_get_delete() {
        let cache = RedisCache::connect("redis://127.0.0.1:6379/0")
            .await
            .unwrap();

        let ack = cache
            .set("todo_test_key", r#"{"id":1}"#.to_string())
            .await
            .unwrap();
        assert_eq!(ack, "OK");

        assert_eq!(cache.get("todo_test_key").await.unwrap(), r#"{"id":1}"#);
        assert_eq!(cache.delete("todo_test_key").await.unwrap(), 1);
        assert!(matches!(
            cache.get("todo_test_key").await,
            Err(CacheError::Miss)
        ));
        assert_eq!(cache.delete("todo_test_key").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let result = RedisCache::connect("not-a-redis-url").await;
        assert!(matches!(result, Err(CacheError::Redis(_))));
    }
}
