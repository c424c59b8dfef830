//! # Tasklane Cache
//!
//! Redis-backed helpers for the Tasklane API.
//!
//! This crate provides:
//! - [`CacheStore`], the narrow set/get/delete contract handlers use, and
//!   [`RedisCache`], its Redis implementation
//! - Cache key builders ([`keys`])
//! - A token-bucket [`RateLimiter`] evaluated atomically inside Redis
//!
//! The cache is never authoritative. Callers treat every error as a miss
//! and carry on with the database result.
//!
//! # Example
//!
//! ```ignore
//! use tasklane_cache::{CacheStore, RedisCache, connection_info, keys};
//!
//! let cache = RedisCache::connect(connection_info("127.0.0.1", 6379, "", 0)).await?;
//! cache.set(&keys::todos::by_id(1), json).await?;
//! let cached = cache.get(&keys::todos::by_id(1)).await?;
//! ```

pub mod connection;
pub mod keys;
pub mod limiter;
pub mod redis;
pub mod store;

pub use connection::connection_info;
pub use limiter::{RateLimit, RateLimitOutcome, RateLimiter};
pub use self::redis::RedisCache;
pub use store::{CacheError, CacheStore};
