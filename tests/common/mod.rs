use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tasklane::modules::todos::DefaultTodoService;
use tasklane::router::init_router;
use tasklane::state::AppState;
use tasklane::testing::{InMemoryCache, InMemoryTodoRepository};
use tasklane_config::AuthConfig;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryTodoRepository>,
    pub cache: Option<Arc<InMemoryCache>>,
}

fn state_for(repo: Arc<InMemoryTodoRepository>) -> AppState {
    AppState::new(Arc::new(DefaultTodoService::new(repo)))
        .with_auth_config(AuthConfig::new(TEST_API_KEY))
}

/// App backed by an in-memory repository, no cache.
#[allow(dead_code)]
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_repo(InMemoryTodoRepository::default())
}

#[allow(dead_code)]
pub fn setup_test_app_with_repo(repo: InMemoryTodoRepository) -> TestApp {
    let repo = Arc::new(repo);
    TestApp {
        router: init_router(state_for(repo.clone())),
        repo,
        cache: None,
    }
}

#[allow(dead_code)]
pub fn setup_test_app_with_cache(cache: InMemoryCache) -> TestApp {
    let repo = Arc::new(InMemoryTodoRepository::default());
    let cache = Arc::new(cache);
    TestApp {
        router: init_router(state_for(repo.clone()).with_cache(cache.clone())),
        repo,
        cache: Some(cache),
    }
}

impl TestApp {
    /// Sends a request carrying the test API key.
    #[allow(dead_code)]
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        self.send_with_key(method, uri, body, Some(TEST_API_KEY))
            .await
    }

    #[allow(dead_code)]
    pub async fn send_with_key(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        api_key: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            request = request.header("x-api-key", key);
        }
        let request = match body {
            Some(json) => request
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&json).unwrap())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        self.dispatch(request).await
    }

    /// Sends `body` verbatim as `application/json` with the test API key.
    #[allow(dead_code)]
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        body: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-api-key", TEST_API_KEY)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.dispatch(request).await
    }

    #[allow(dead_code)]
    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };

        (status, body)
    }
}
