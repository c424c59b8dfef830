//! Best-effort caching of single todos.
//!
//! Every failure here is logged and swallowed: a cache that is down, empty,
//! or holding garbage never changes an HTTP status.

use std::sync::Arc;

use tasklane_cache::keys::todos;
use tasklane_cache::{CacheError, CacheStore};
use serde::Deserialize;
use tasklane_models::todos::TodoResponse;
use tracing::{debug, warn};

use crate::metrics::track_cache_operation;

/// A cache entry as read back; any subset of the response fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CachedTodo {
    name: Option<String>,
    description: Option<String>,
}

impl CachedTodo {
    fn apply(self, mut todo: TodoResponse) -> TodoResponse {
        if let Some(name) = self.name {
            todo.name = name;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        todo
    }
}

pub struct TodoCache<'a> {
    store: Option<&'a Arc<dyn CacheStore>>,
}

impl<'a> TodoCache<'a> {
    pub fn new(store: Option<&'a Arc<dyn CacheStore>>) -> Self {
        Self { store }
    }

    /// Writes the todo under `todo_<id>` with no expiry.
    pub async fn store(&self, todo: &TodoResponse) {
        let Some(store) = self.store else { return };

        let payload = match serde_json::to_string(todo) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(todo.id = todo.id, error = %e, "Failed to encode todo for cache");
                return;
            }
        };

        match store.set(&todos::by_id(todo.id), payload).await {
            Ok(_) => track_cache_operation("set", "ok"),
            Err(e) => {
                track_cache_operation("set", "error");
                warn!(todo.id = todo.id, error = %e, "Failed to cache todo");
            }
        }
    }

    /// Applies the cached entry for `id` on top of `fetched`.
    ///
    /// Fields the entry carries replace the fetched ones; absent or null
    /// fields keep the fetched value. The id always comes from the store.
    /// A miss, an undecodable entry or a cache error returns `fetched` as is.
    pub async fn overlay(&self, id: i64, fetched: TodoResponse) -> TodoResponse {
        let Some(store) = self.store else {
            return fetched;
        };

        match store.get(&todos::by_id(id)).await {
            Ok(raw) => match serde_json::from_str::<CachedTodo>(&raw) {
                Ok(cached) => {
                    track_cache_operation("get", "hit");
                    cached.apply(fetched)
                }
                Err(e) => {
                    track_cache_operation("get", "error");
                    warn!(todo.id = id, error = %e, "Ignoring undecodable cache entry");
                    fetched
                }
            },
            Err(CacheError::Miss) => {
                track_cache_operation("get", "miss");
                debug!(todo.id = id, "Todo not in cache");
                fetched
            }
            Err(e) => {
                track_cache_operation("get", "error");
                warn!(todo.id = id, error = %e, "Failed to read todo from cache");
                fetched
            }
        }
    }

    pub async fn evict(&self, id: i64) {
        let Some(store) = self.store else { return };

        match store.delete(&todos::by_id(id)).await {
            Ok(_) => track_cache_operation("delete", "ok"),
            Err(e) => {
                track_cache_operation("delete", "error");
                warn!(todo.id = id, error = %e, "Failed to evict todo from cache");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryCache;

    fn todo(id: i64) -> TodoResponse {
        TodoResponse {
            id,
            name: "Buy milk".into(),
            description: "2%".into(),
        }
    }

    fn fetched(id: i64) -> TodoResponse {
        TodoResponse {
            id,
            name: "from store".into(),
            description: "store desc".into(),
        }
    }

    #[tokio::test]
    async fn test_store_then_overlay() {
        let inner = Arc::new(InMemoryCache::default());
        let store: Arc<dyn CacheStore> = inner.clone();
        let cache = TodoCache::new(Some(&store));

        cache.store(&todo(3)).await;

        assert_eq!(
            inner.entry("todo_3").as_deref(),
            Some(r#"{"id":3,"name":"Buy milk","description":"2%"}"#)
        );
        assert_eq!(cache.overlay(3, fetched(3)).await, todo(3));
    }

    #[tokio::test]
    async fn test_partial_entry_overrides_only_its_fields() {
        let inner = Arc::new(InMemoryCache::default());
        inner.seed("todo_4", r#"{"name":"x","description":null}"#);
        let store: Arc<dyn CacheStore> = inner;

        let todo = TodoCache::new(Some(&store)).overlay(4, fetched(4)).await;

        assert_eq!(todo.id, 4);
        assert_eq!(todo.name, "x");
        assert_eq!(todo.description, "store desc");
    }

    #[tokio::test]
    async fn test_entry_id_does_not_replace_stored_id() {
        let inner = Arc::new(InMemoryCache::default());
        inner.seed("todo_6", r#"{"id":99,"name":"y"}"#);
        let store: Arc<dyn CacheStore> = inner;

        let todo = TodoCache::new(Some(&store)).overlay(6, fetched(6)).await;

        assert_eq!(todo.id, 6);
        assert_eq!(todo.name, "y");
    }

    #[tokio::test]
    async fn test_garbage_entry_is_ignored() {
        let inner = Arc::new(InMemoryCache::default());
        inner.seed("todo_5", "not json");
        let store: Arc<dyn CacheStore> = inner;

        assert_eq!(
            TodoCache::new(Some(&store)).overlay(5, fetched(5)).await,
            fetched(5)
        );
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let inner = Arc::new(InMemoryCache::failing());
        let store: Arc<dyn CacheStore> = inner.clone();
        let cache = TodoCache::new(Some(&store));

        cache.store(&todo(1)).await;
        assert_eq!(cache.overlay(1, fetched(1)).await, fetched(1));
        cache.evict(1).await;

        assert_eq!(inner.ops(), vec!["SET todo_1", "GET todo_1", "DEL todo_1"]);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = TodoCache::new(None);

        cache.store(&todo(1)).await;
        cache.evict(1).await;
        assert_eq!(cache.overlay(1, fetched(1)).await, fetched(1));
    }
}
