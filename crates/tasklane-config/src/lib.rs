//! # Tasklane Config
//!
//! Configuration types for the Tasklane API.
//!
//! Settings come from two places:
//!
//! - [`app`]: the JSON config file (server port, log sink, database and
//!   cache connection parameters)
//! - [`auth`] and [`cors`]: secrets and origins read from environment variables
//!
//! # Example
//!
//! ```ignore
//! use tasklane_config::{AppConfig, AuthConfig, CorsConfig};
//!
//! let config = AppConfig::load("configs/config.json")?;
//! let auth_config = AuthConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod app;
pub mod auth;
pub mod cors;
mod serde;

pub use app::{AppConfig, ConfigError, DatabaseConfig, LogType, MainConfig, RedisConfig, Toggle};
pub use auth::AuthConfig;
pub use cors::CorsConfig;

/// Config file used when `CONFIG_DIR` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.json";
