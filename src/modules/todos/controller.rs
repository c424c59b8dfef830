use anyhow::anyhow;
use axum::{Json, extract::State, http::StatusCode};
use tasklane_core::{AppError, ErrorBody};
use tasklane_models::{
    MessageResponse,
    todos::{CreateTodoRequest, TodoResponse, UpdateTodoRequest},
};
use tracing::{error, instrument, warn};

use crate::modules::todos::cache::TodoCache;
use crate::modules::todos::repository::RepoError;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

fn todo_not_found(id: i64, err: RepoError) -> AppError {
    if !matches!(err, RepoError::NotFound) {
        warn!(todo.id = id, error = %err, "Todo lookup failed");
    }
    AppError::not_found(anyhow!("Todo not found"))
}

#[utoipa::path(
    post,
    path = "/api/v2/todo",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Malformed body or empty fields", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Todos",
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn create_todo(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let todo = state
        .todo_service
        .create_todo(req.into())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create todo");
            AppError::internal(anyhow!("Failed to create todo"))
        })?;

    let todo = TodoResponse::from(todo);
    TodoCache::new(state.cache.as_ref()).store(&todo).await;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// The store is always consulted first; a cached copy, when present,
/// replaces the fetched one in the response.
#[utoipa::path(
    get,
    path = "/api/v2/todo/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo found", body = TodoResponse),
        (status = 400, description = "Non-numeric ID", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key", body = ErrorBody),
        (status = 404, description = "Todo not found", body = ErrorBody)
    ),
    tag = "Todos",
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<TodoResponse>, AppError> {
    let todo = state
        .todo_service
        .get_todo_by_id(id)
        .await
        .map_err(|e| todo_not_found(id, e))?;

    let todo = TodoCache::new(state.cache.as_ref())
        .overlay(id, TodoResponse::from(todo))
        .await;

    Ok(Json(todo))
}

#[utoipa::path(
    get,
    path = "/api/v2/todo",
    responses(
        (status = 200, description = "All todos in ID order", body = Vec<TodoResponse>),
        (status = 401, description = "Missing or wrong API key", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Todos",
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn get_all_todos(
    State(state): State<AppState>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let todos = state.todo_service.get_all_todos().await.map_err(|e| {
        error!(error = %e, "Failed to list todos");
        AppError::internal(anyhow!("Failed to get todos"))
    })?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// The existing record is looked up before the body is checked, so an
/// unknown id answers 404 even when the body is also bad.
#[utoipa::path(
    put,
    path = "/api/v2/todo/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Non-numeric ID, malformed body or empty fields", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key", body = ErrorBody),
        (status = 404, description = "Todo not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Todos",
    security(("api_key" = []))
)]
#[instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    PathId(id): PathId,
    payload: Result<ValidatedJson<UpdateTodoRequest>, AppError>,
) -> Result<Json<TodoResponse>, AppError> {
    let existing = state
        .todo_service
        .get_todo_by_id(id)
        .await
        .map_err(|e| todo_not_found(id, e))?;

    let ValidatedJson(changes) = payload?;
    if changes.id.is_some_and(|body_id| body_id != id) {
        warn!(todo.id = id, body.id = ?changes.id, "Ignoring mismatched body id");
    }

    let updated = state
        .todo_service
        .update_todo(&existing.revised(&changes))
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::not_found(anyhow!("Todo not found")),
            other => {
                error!(todo.id = id, error = %other, "Failed to update todo");
                AppError::internal(anyhow!("Failed to update todo"))
            }
        })?;

    TodoCache::new(state.cache.as_ref()).evict(id).await;

    Ok(Json(TodoResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v2/todo/{id}",
    params(("id" = i64, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 400, description = "Non-numeric ID", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key", body = ErrorBody),
        (status = 404, description = "Todo not found", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tag = "Todos",
    security(("api_key" = []))
)]
#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .todo_service
        .get_todo_by_id(id)
        .await
        .map_err(|e| todo_not_found(id, e))?;

    state
        .todo_service
        .delete_todo(id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::not_found(anyhow!("ID not found")),
            other => {
                error!(todo.id = id, error = %other, "Failed to delete todo");
                AppError::internal(anyhow!("Failed to delete todo"))
            }
        })?;

    TodoCache::new(state.cache.as_ref()).evict(id).await;

    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}
