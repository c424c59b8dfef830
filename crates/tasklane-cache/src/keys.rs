//! Cache key builders.
//!
//! Keeping the formats in one place means writers and readers cannot drift.

/// Keys for cached todo responses.
pub mod todos {
    const PREFIX: &str = "todo_";

    /// Key for a single todo by ID.
    pub fn by_id(id: i64) -> String {
        format!("{}{}", PREFIX, id)
    }
}

/// Keys for rate-limit buckets.
pub mod rate_limits {
    const PREFIX: &str = "rate:";

    pub fn bucket(key: &str) -> String {
        format!("{}{}", PREFIX, key)
    }
}
