//! Token-bucket rate limiting backed by Redis.
//!
//! Each key owns a bucket whose capacity equals the per-second limit and
//! which refills at that same rate. The refill-and-take step runs as a single
//! Lua script so concurrent callers across processes see a consistent count.

use std::sync::Arc;
use std::time::Duration;

use ::redis::{Client, IntoConnectionInfo, Script, aio::ConnectionManager};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::keys::rate_limits;
use crate::store::CacheError;

const TOKEN_BUCKET_SCRIPT: &str = r#"
if redis.replicate_commands then
  redis.replicate_commands()
end

local key = KEYS[1]
local rate = tonumber(ARGV[1])
local capacity = tonumber(ARGV[2])
local requested = tonumber(ARGV[3])

local clock = redis.call('TIME')
local now = tonumber(clock[1]) + tonumber(clock[2]) / 1000000

local state = redis.call('HMGET', key, 'tokens', 'ts')
local tokens = tonumber(state[1])
local ts = tonumber(state[2])
if tokens == nil or ts == nil then
  tokens = capacity
  ts = now
end

local elapsed = math.max(0, now - ts)
tokens = math.min(capacity, tokens + elapsed * rate)

local allowed = 0
local retry_after = -1
if tokens >= requested then
  tokens = tokens - requested
  allowed = requested
else
  retry_after = (requested - tokens) / rate
end

redis.call('HSET', key, 'tokens', tostring(tokens), 'ts', tostring(now))
redis.call('EXPIRE', key, math.ceil(capacity / rate) + 1)

return { allowed, math.floor(tokens), tostring(retry_after) }
"#;

/// Result of one admission check.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitOutcome {
    /// Number of requests admitted by this call (0 or 1).
    pub allowed: i64,
    /// Whole tokens left in the bucket after this call.
    pub remaining: i64,
    /// How long until a token is available, when the request was rejected.
    pub retry_after: Option<Duration>,
}

impl RateLimitOutcome {
    fn from_reply((allowed, remaining, retry_after): (i64, i64, String)) -> Self {
        let retry_after = retry_after
            .parse::<f64>()
            .ok()
            .filter(|secs| *secs >= 0.0)
            .map(Duration::from_secs_f64);

        Self {
            allowed,
            remaining,
            retry_after,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed >= 1
    }
}

/// Per-second admission control keyed by an arbitrary string (client IP, API key, …).
#[async_trait]
pub trait RateLimit: Send + Sync + 'static {
    /// Takes one token from the bucket for `key`, refilling at `limit` per second.
    async fn allow_per_sec(&self, key: &str, limit: u32) -> Result<RateLimitOutcome, CacheError>;

    /// Returns `true` when the request must be rejected.
    async fn limit_request_per_second(&self, key: &str, limit: u32) -> Result<bool, CacheError> {
        let outcome = self.allow_per_sec(key, limit).await?;
        Ok(!outcome.is_allowed())
    }
}

/// Redis-backed token bucket limiter.
#[derive(Clone)]
pub struct RateLimiter {
    conn: ConnectionManager,
    script: Arc<Script>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Connects to the Redis database reserved for rate-limit buckets.
    pub async fn connect(info: impl IntoConnectionInfo) -> Result<Self, CacheError> {
        let client = Client::open(info)?;
        let mut conn = ConnectionManager::new(client).await?;
        let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;

        info!("Rate limiter connected to Redis");

        Ok(Self {
            conn,
            script: Arc::new(Script::new(TOKEN_BUCKET_SCRIPT)),
        })
    }
}

#[async_trait]
impl RateLimit for RateLimiter {
    #[instrument(skip(self))]
    async fn allow_per_sec(&self, key: &str, limit: u32) -> Result<RateLimitOutcome, CacheError> {
        if limit == 0 {
            return Err(CacheError::InvalidLimit(limit));
        }

        let mut conn = self.conn.clone();
        let reply: (i64, i64, String) = self
            .script
            .key(rate_limits::bucket(key))
            .arg(limit)
            .arg(limit)
            .arg(1)
            .invoke_async(&mut conn)
            .await?;

        let outcome = RateLimitOutcome::from_reply(reply);
        debug!(
            rate.key = %key,
            rate.allowed = outcome.allowed,
            rate.remaining = outcome.remaining,
            "Rate limit checked"
        );

        Ok(outcome)
    }
}
