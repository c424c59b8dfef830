mod common;

use axum::http::StatusCode;
use common::{setup_test_app, setup_test_app_with_repo};
use serde_json::json;
use tasklane::testing::{InMemoryTodoRepository, RepoOp};

#[tokio::test]
async fn test_todo_lifecycle() {
    let app = setup_test_app();

    let (status, body) = app
        .send(
            "POST",
            "/api/v2/todo",
            Some(json!({ "name": "Buy milk", "description": "2%" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Buy milk", "description": "2%" })
    );

    let (status, body) = app.send("GET", "/api/v2/todo/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Buy milk");
    assert_eq!(body["description"], "2%");

    let (status, body) = app
        .send(
            "PUT",
            "/api/v2/todo/1",
            Some(json!({ "id": 1, "name": "Buy milk", "description": "1%" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Buy milk", "description": "1%" })
    );

    let (status, body) = app.send("DELETE", "/api/v2/todo/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Todo deleted successfully" }));

    let (status, body) = app.send("GET", "/api/v2/todo/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ERR_NOT_FOUND");
}

#[tokio::test]
async fn test_list_is_empty_array_then_in_id_order() {
    let app = setup_test_app();

    let (status, body) = app.send("GET", "/api/v2/todo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for name in ["first", "second", "third"] {
        app.send(
            "POST",
            "/api/v2/todo",
            Some(json!({ "name": name, "description": "d" })),
        )
        .await;
    }
    app.send("DELETE", "/api/v2/todo/2", None).await;

    let (status, body) = app.send("GET", "/api/v2/todo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "name": "first", "description": "d" },
            { "id": 3, "name": "third", "description": "d" }
        ])
    );
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected_without_store_calls() {
    let app = setup_test_app();

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "name": "a", "description": "b" }))),
        ("DELETE", None),
    ] {
        let (status, json) = app.send(method, "/api/v2/todo/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(json["error"], "Invalid ID");
    }

    assert_eq!(app.repo.call_count(), 0);
}

#[tokio::test]
async fn test_create_rejects_empty_fields() {
    let app = setup_test_app();

    let (status, body) = app
        .send(
            "POST",
            "/api/v2/todo",
            Some(json!({ "name": "", "description": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ERR_REQUEST_INVALID");
    assert_eq!(
        body["details"],
        json!(["description is required", "name is required"])
    );
    assert_eq!(app.repo.call_count(), 0);
}

#[tokio::test]
async fn test_create_names_missing_field() {
    let app = setup_test_app();

    let (status, body) = app
        .send("POST", "/api/v2/todo", Some(json!({ "name": "only name" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "description is required");
}

#[tokio::test]
async fn test_create_rejects_invalid_json_syntax() {
    let app = setup_test_app();

    let (status, body) = app.send_raw("POST", "/api/v2/todo", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ERR_REQUEST_INVALID");
    assert_eq!(body["error"], "Invalid request body");
    assert_eq!(app.repo.call_count(), 0);
}

#[tokio::test]
async fn test_update_ignores_body_id() {
    let app = setup_test_app();
    app.send(
        "POST",
        "/api/v2/todo",
        Some(json!({ "name": "a", "description": "b" })),
    )
    .await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/v2/todo/1",
            Some(json!({ "id": 99, "name": "renamed", "description": "b" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "renamed");

    let rows = app.repo.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].status, "doing");
}

#[tokio::test]
async fn test_update_missing_id_is_not_found_before_body_checks() {
    let app = setup_test_app();

    let (status, _) = app
        .send("PUT", "/api/v2/todo/7", Some(json!({ "name": "" })))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_empty_name_on_existing_todo() {
    let app = setup_test_app();
    app.send(
        "POST",
        "/api/v2/todo",
        Some(json!({ "name": "a", "description": "b" })),
    )
    .await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/v2/todo/1",
            Some(json!({ "name": "", "description": "b" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], json!(["name is required"]));
    assert_eq!(app.repo.rows()[0].name, "a");
}

#[tokio::test]
async fn test_delete_missing_id_is_not_found() {
    let app = setup_test_app();

    let (status, body) = app.send("DELETE", "/api/v2/todo/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ERR_NOT_FOUND");
}

#[tokio::test]
async fn test_store_failures_map_to_documented_statuses() {
    let app = setup_test_app_with_repo(InMemoryTodoRepository::failing());

    let (status, body) = app
        .send(
            "POST",
            "/api/v2/todo",
            Some(json!({ "name": "a", "description": "b" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "ERR_SYSTEM_ERROR");
    assert!(!body["error"].as_str().unwrap().contains("pool"));

    let (status, _) = app.send("GET", "/api/v2/todo", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app.send("GET", "/api/v2/todo/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_store_failure_is_internal_error() {
    let app =
        setup_test_app_with_repo(InMemoryTodoRepository::default().failing_on(RepoOp::Update));
    app.send(
        "POST",
        "/api/v2/todo",
        Some(json!({ "name": "a", "description": "b" })),
    )
    .await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/v2/todo/1",
            Some(json!({ "name": "renamed", "description": "b" })),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "ERR_SYSTEM_ERROR");
    assert_eq!(body["error"], "Failed to update todo");
    assert_eq!(app.repo.rows()[0].name, "a");
}

#[tokio::test]
async fn test_update_of_row_gone_after_lookup_is_not_found() {
    let app =
        setup_test_app_with_repo(InMemoryTodoRepository::default().not_found_on(RepoOp::Update));
    app.send(
        "POST",
        "/api/v2/todo",
        Some(json!({ "name": "a", "description": "b" })),
    )
    .await;

    let (status, body) = app
        .send(
            "PUT",
            "/api/v2/todo/1",
            Some(json!({ "name": "renamed", "description": "b" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ERR_NOT_FOUND");
    assert_eq!(body["error"], "Todo not found");
}

#[tokio::test]
async fn test_delete_store_failure_is_internal_error() {
    let app =
        setup_test_app_with_repo(InMemoryTodoRepository::default().failing_on(RepoOp::Delete));
    app.send(
        "POST",
        "/api/v2/todo",
        Some(json!({ "name": "a", "description": "b" })),
    )
    .await;

    let (status, body) = app.send("DELETE", "/api/v2/todo/1", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "ERR_SYSTEM_ERROR");
    assert_eq!(body["error"], "Failed to delete todo");
    assert_eq!(app.repo.rows()[0].deleted_at, None);

    let (status, _) = app.send("GET", "/api/v2/todo/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_service_info_is_public() {
    let app = setup_test_app();

    let (status, body) = app
        .send_with_key("GET", "/service", None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "tasklane-service");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
