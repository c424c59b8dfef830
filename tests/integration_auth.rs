mod common;

use axum::http::StatusCode;
use common::{TEST_API_KEY, setup_test_app};
use serde_json::json;

#[tokio::test]
async fn test_missing_key_is_rejected_before_handler() {
    let app = setup_test_app();

    let (status, body) = app
        .send_with_key(
            "POST",
            "/api/v2/todo",
            Some(json!({ "name": "a", "description": "b" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization failed");
    assert_eq!(body["code"], "ERR_UNAUTHORIZED");
    assert_eq!(app.repo.call_count(), 0);
}

#[tokio::test]
async fn test_wrong_key_is_rejected() {
    let app = setup_test_app();

    for key in ["", "wrong", "TEST-API-KEY", "test-api-key "] {
        let (status, _) = app
            .send_with_key("GET", "/api/v2/todo", None, Some(key))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "key {key:?}");
    }
    assert_eq!(app.repo.call_count(), 0);
}

#[tokio::test]
async fn test_auth_runs_before_path_parsing() {
    let app = setup_test_app();

    let (status, _) = app
        .send_with_key("GET", "/api/v2/todo/abc", None, None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_correct_key_is_accepted() {
    let app = setup_test_app();

    let (status, body) = app
        .send_with_key("GET", "/api/v2/todo", None, Some(TEST_API_KEY))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_docs_are_public() {
    let app = setup_test_app();

    let (status, body) = app
        .send_with_key("GET", "/api-docs/openapi.json", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v2/todo"].is_object());
}
