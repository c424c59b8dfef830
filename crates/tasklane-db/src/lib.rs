//! # Tasklane DB
//!
//! PostgreSQL connection pool setup for the Tasklane API.
//!
//! The pool is opened once at startup with a bounded number of attempts and
//! then shared by every request through the application state.
//!
//! # Example
//!
//! ```ignore
//! use tasklane_db::{RetryPolicy, connect_with_retry};
//!
//! let pool = connect_with_retry(&config.db, RetryPolicy::default()).await?;
//! ```

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tasklane_config::DatabaseConfig;
use tracing::{info, warn};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// How many times to try the initial connection and how long to wait in between.
///
/// The wait grows linearly: `step × attempt` after each failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub step: Duration,
    /// Upper bound for a single attempt.
    pub connect_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            step: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Wait before the next attempt, or `None` after the last one.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_attempts).then(|| self.step * attempt)
    }
}

pub fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.username)
        .password(&config.password)
}

/// Opens the PostgreSQL pool, retrying with linear backoff.
///
/// Returns the error from the final attempt once the policy is exhausted.
pub async fn connect_with_retry(
    config: &DatabaseConfig,
    policy: RetryPolicy,
) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(policy.connect_timeout)
            .connect_with(connect_options(config))
            .await;

        match result {
            Ok(pool) => {
                info!(
                    attempt,
                    host = %config.host,
                    database = %config.database,
                    "Connected to database"
                );
                return Ok(pool);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    error = %e,
                    "Failed to connect to database"
                );

                match policy.backoff(attempt) {
                    Some(wait) => {
                        info!(wait_secs = wait.as_secs(), "Retrying database connection");
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_linearly() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.backoff(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.backoff(4), Some(Duration::from_secs(8)));
        assert_eq!(policy.backoff(5), None);
    }

    #[tokio::test]
    async fn test_gives_up_after_last_attempt() {
        let config = DatabaseConfig {
            host: "127.0.0.1".into(),
            // Reserved port, nothing listens here.
            port: 1,
            ..DatabaseConfig::default()
        };
        let policy = RetryPolicy {
            max_attempts: 2,
            step: Duration::from_millis(10),
            connect_timeout: Duration::from_millis(500),
        };

        let result = connect_with_retry(&config, policy).await;

        assert!(result.is_err());
    }
}
