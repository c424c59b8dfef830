//! JSON config file.
//!
//! The file has three sections. `main` is required; `db` and `redis` fall back
//! to local defaults when omitted.
//!
//! ```json
//! {
//!   "main":  { "port": "9002", "log_type": "CONSOLE", "db": "enabled", "redis": "disabled" },
//!   "db":    { "host": "localhost", "port": 5432, "database": "todo",
//!              "username": "postgres", "password": "postgres" },
//!   "redis": { "address": "localhost:6379", "password": "", "db": 0 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::serde::deserialize_port;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// On/off switch written as `"enabled"` / `"disabled"` in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Enabled,
    #[default]
    Disabled,
}

impl Toggle {
    pub fn is_enabled(self) -> bool {
        self == Toggle::Enabled
    }
}

/// Where log output goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    #[default]
    Console,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub main: MainConfig,
    #[serde(default)]
    pub db: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainConfig {
    #[serde(deserialize_with = "deserialize_port", default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub log_type: LogType,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default)]
    pub db: Toggle,
    #[serde(default)]
    pub redis: Toggle,
    #[serde(default = "default_true")]
    pub metrics: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5432,
            database: "todo".into(),
            username: "postgres".into(),
            password: String::new(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// `host:port` of the Redis server.
    pub address: String,
    pub password: String,
    /// Logical database used by the cache.
    pub db: i64,
    /// Logical database used by the rate limiter.
    pub rate_limit_db: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: "localhost:6379".into(),
            password: String::new(),
            db: 0,
            rate_limit_db: 10,
        }
    }
}

impl RedisConfig {
    /// Splits `address` into host and port; the port defaults to 6379.
    ///
    /// Bracketed IPv6 hosts (`[::1]:6379`) are returned without brackets.
    pub fn host_port(&self) -> Result<(String, u16), ConfigError> {
        let address = self.address.trim();
        let invalid = || ConfigError::Invalid(format!("redis.address {address:?} is not host:port"));

        let (host, port) = match address.strip_prefix('[') {
            Some(rest) => {
                let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
                match tail.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None if tail.is_empty() => (host, None),
                    None => return Err(invalid()),
                }
            }
            None => match address.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (address, None),
            },
        };

        if host.is_empty() {
            return Err(invalid());
        }
        let port = match port {
            Some(port) => port.parse::<u16>().map_err(|_| invalid())?,
            None => DEFAULT_REDIS_PORT,
        };

        Ok((host.to_string(), port))
    }
}

const DEFAULT_REDIS_PORT: u16 = 6379;

fn default_http_port() -> u16 {
    9002
}

fn default_log_file() -> PathBuf {
    PathBuf::from("storage/logs/tasklane.log")
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.main.port == 0 {
            return Err(ConfigError::Invalid("main.port must not be 0".into()));
        }
        if self.main.db.is_enabled() && self.db.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "db.max_connections must be at least 1".into(),
            ));
        }
        if self.main.redis.is_enabled() {
            if self.redis.address.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "redis.address is required when redis is enabled".into(),
                ));
            }
            self.redis.host_port()?;
        }
        Ok(())
    }
}
