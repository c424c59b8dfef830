use std::env;

/// Shared secret expected in the `X-API-KEY` header.
#[derive(Clone)]
pub struct AuthConfig {
    pub api_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Self {
        Self {
            api_key: env::var("API_KEY").unwrap_or_default(),
        }
    }

    /// An empty secret never matches, so every guarded request is rejected.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
