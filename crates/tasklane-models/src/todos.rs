//! Todo domain models and DTOs.
//!
//! [`Todo`] is the row stored in the `todo` table. The DTOs are the subsets
//! that cross the HTTP boundary; the cache stores [`TodoResponse`] as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Status given to every new todo by the column default.
pub const DEFAULT_STATUS: &str = "doing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the todo is soft-deleted; such rows are hidden from reads.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Same record with the incoming name and description; id, status and timestamps are kept.
    pub fn revised(&self, changes: &UpdateTodoRequest) -> Todo {
        Todo {
            name: changes.name.clone(),
            description: changes.description.clone(),
            ..self.clone()
        }
    }
}

/// Fields supplied by the caller when inserting; the store fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub name: String,
    pub description: String,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(req: CreateTodoRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "Buy milk")]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    #[schema(example = "2%")]
    pub description: String,
}

/// Update payload. `id` is accepted so clients can send the object back as
/// they received it, but the id in the path decides which todo changes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "name is required"))]
    #[schema(example = "Buy milk")]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    #[schema(example = "1%")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Buy milk")]
    pub name: String,
    #[schema(example = "2%")]
    pub description: String,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            name: todo.name.clone(),
            description: todo.description.clone(),
        }
    }
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            name: todo.name,
            description: todo.description,
        }
    }
}
