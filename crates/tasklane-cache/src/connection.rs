//! Structured Redis connection parameters.
//!
//! Building [`ConnectionInfo`] field by field keeps passwords with URL
//! reserved characters (`@`, `/`, `#`, `:`) intact.

use ::redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

/// Plain TCP connection to `host:port`, selecting logical database `db`.
///
/// An empty password means no `AUTH`.
pub fn connection_info(
    host: impl Into<String>,
    port: u16,
    password: &str,
    db: i64,
) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(host.into(), port),
        redis: RedisConnectionInfo {
            db,
            password: (!password.is_empty()).then(|| password.to_string()),
            ..RedisConnectionInfo::default()
        },
    }
}
