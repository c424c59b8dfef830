//! Persistence gateway for todos.
//!
//! [`TodoRepository`] is the narrow contract the service layer uses;
//! [`PgTodoRepository`] implements it on PostgreSQL with soft deletes.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use tasklane_models::todos::{NewTodo, Todo};
use tracing::{error, info, instrument};

/// Embedded schema migrations (`migrations/`).
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const TODO_COLUMNS: &str = "id, name, description, status, created_at, updated_at, deleted_at";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("id not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Inserts a todo; the store assigns id, status and timestamps.
    async fn create(&self, todo: NewTodo) -> Result<Todo, RepoError>;

    /// Fails with [`RepoError::NotFound`] for missing or soft-deleted ids.
    async fn find_by_id(&self, id: i64) -> Result<Todo, RepoError>;

    /// All live todos in id order.
    async fn find_all(&self) -> Result<Vec<Todo>, RepoError>;

    /// Overwrites the stored record with the same id.
    async fn update(&self, todo: &Todo) -> Result<Todo, RepoError>;

    /// Soft-deletes the todo.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    db: PgPool,
}

impl PgTodoRepository {
    /// Wraps the pool and brings the schema up to date.
    ///
    /// A failed migration is logged and the repository is still returned; the
    /// queries themselves will surface any remaining schema problem.
    pub async fn new(db: PgPool) -> Self {
        let repo = Self { db };
        match repo.migrate().await {
            Ok(()) => info!("Todo schema is up to date"),
            Err(e) => error!(error = %e, "Failed to migrate todo schema"),
        }
        repo
    }

    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.db).await
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    #[instrument(skip(self))]
    async fn create(&self, todo: NewTodo) -> Result<Todo, RepoError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todo (name, description) VALUES ($1, $2) RETURNING {TODO_COLUMNS}"
        ))
        .bind(&todo.name)
        .bind(&todo.description)
        .fetch_one(&self.db)
        .await?;

        Ok(todo)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Todo, RepoError> {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todo WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Todo>, RepoError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todo WHERE deleted_at IS NULL ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(todos)
    }

    #[instrument(skip(self), fields(todo.id = todo.id))]
    async fn update(&self, todo: &Todo) -> Result<Todo, RepoError> {
        sqlx::query_as::<_, Todo>(&format!(
            r#"UPDATE todo
               SET name = $2, description = $3, status = $4, updated_at = NOW()
               WHERE id = $1 AND deleted_at IS NULL
               RETURNING {TODO_COLUMNS}"#
        ))
        .bind(todo.id)
        .bind(&todo.name)
        .bind(&todo.description)
        .bind(&todo.status)
        .fetch_optional(&self.db)
        .await?
        .ok_or(RepoError::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE todo SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
