use std::sync::Arc;

use anyhow::{Context, bail};
use metrics_exporter_prometheus::PrometheusHandle;
use tasklane_cache::{CacheStore, RateLimit, RateLimiter, RedisCache, connection_info};
use tasklane_config::{AppConfig, AuthConfig, CorsConfig};
use tasklane_db::{PgPool, RetryPolicy, connect_with_retry};
use tracing::info;

use crate::metrics::init_metrics;
use crate::modules::todos::{DefaultTodoService, PgTodoRepository, TodoService};

/// Everything handlers and middleware share, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub todo_service: Arc<dyn TodoService>,
    /// `None` when `main.redis` is disabled.
    pub cache: Option<Arc<dyn CacheStore>>,
    /// Built alongside the cache; no route enforces it yet.
    pub rate_limiter: Option<Arc<dyn RateLimit>>,
    pub auth_config: AuthConfig,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with no cache, no limiter and no metrics, reading auth and CORS
    /// settings from the environment.
    pub fn new(todo_service: Arc<dyn TodoService>) -> Self {
        Self {
            todo_service,
            cache: None,
            rate_limiter: None,
            auth_config: AuthConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            metrics: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimit>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Connects to PostgreSQL, retrying per [`RetryPolicy::default`].
pub async fn init_db_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    if !config.main.db.is_enabled() {
        bail!("Database is disabled in config; the server cannot start without it");
    }

    connect_with_retry(&config.db, RetryPolicy::default())
        .await
        .context("Failed to connect to the database")
}

pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = init_db_pool(config).await?;
    let repo = PgTodoRepository::new(pool).await;
    let mut state = AppState::new(Arc::new(DefaultTodoService::new(Arc::new(repo))));

    if config.main.redis.is_enabled() {
        let redis = &config.redis;
        let (host, port) = redis.host_port()?;
        let cache = RedisCache::connect(connection_info(&host, port, &redis.password, redis.db))
            .await
            .context("Failed to connect to the Redis cache")?;
        let limiter = RateLimiter::connect(connection_info(
            host,
            port,
            &redis.password,
            redis.rate_limit_db,
        ))
        .await
        .context("Failed to connect the rate limiter to Redis")?;
        state = state
            .with_cache(Arc::new(cache))
            .with_rate_limiter(Arc::new(limiter));
    } else {
        info!("Redis is disabled; todos will not be cached");
    }

    if config.main.metrics {
        state = state.with_metrics(init_metrics()?);
    }

    Ok(state)
}
