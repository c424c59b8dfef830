//! The contract handlers use to talk to the side cache.

use async_trait::async_trait;

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Cache miss")]
    Miss,

    #[error("rate limit must be at least 1 request per second, got {0}")]
    InvalidLimit(u32),
}

/// String-keyed side cache.
///
/// Values are opaque strings; callers serialize before `set` and decode
/// after `get`. Entries carry no expiry.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Stores `value` under `key`, returning the server acknowledgement.
    async fn set(&self, key: &str, value: String) -> Result<String, CacheError>;

    /// Returns the value under `key`, or [`CacheError::Miss`] when absent.
    async fn get(&self, key: &str) -> Result<String, CacheError>;

    /// Removes `key`, returning how many entries were deleted.
    async fn delete(&self, key: &str) -> Result<i64, CacheError>;
}
