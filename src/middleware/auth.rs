use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tasklane_config::AuthConfig;
use tasklane_core::AppError;
use tracing::warn;

use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Exact, case-sensitive, constant-time match against the configured secret.
/// An empty header or an unset secret never matches.
pub fn api_key_matches(config: &AuthConfig, provided: &str) -> bool {
    if provided.is_empty() || !config.is_configured() {
        return false;
    }
    provided.as_bytes().ct_eq(config.api_key.as_bytes()).into()
}

/// Rejects the request with 401 unless `X-API-KEY` carries the shared secret.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let guarded = init_todos_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));
/// ```
pub async fn require_api_key(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !api_key_matches(&state.auth_config, provided) {
        warn!(
            method = %req.method(),
            path = %req.uri().path(),
            header_present = !provided.is_empty(),
            "Rejected request with invalid API key"
        );
        return AppError::unauthorized(anyhow!("Authorization failed")).into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key_matches() {
        let config = AuthConfig::new("s3cret");
        assert!(api_key_matches(&config, "s3cret"));
    }

    #[test]
    fn test_wrong_case_or_length_is_rejected() {
        let config = AuthConfig::new("s3cret");
        assert!(!api_key_matches(&config, "S3CRET"));
        assert!(!api_key_matches(&config, "s3cre"));
        assert!(!api_key_matches(&config, "s3cret "));
    }

    #[test]
    fn test_empty_values_never_match() {
        assert!(!api_key_matches(&AuthConfig::new("s3cret"), ""));
        assert!(!api_key_matches(&AuthConfig::new(""), ""));
        assert!(!api_key_matches(&AuthConfig::new(""), "anything"));
    }
}
