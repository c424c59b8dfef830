use std::sync::Arc;

use async_trait::async_trait;
use tasklane_models::todos::{NewTodo, Todo};
use tracing::instrument;

use super::repository::{RepoError, TodoRepository};

/// What the HTTP layer needs from the todo domain.
///
/// Handlers hold an `Arc<dyn TodoService>` so tests can swap in their own.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, RepoError>;
    async fn get_todo_by_id(&self, id: i64) -> Result<Todo, RepoError>;
    async fn get_all_todos(&self) -> Result<Vec<Todo>, RepoError>;
    async fn update_todo(&self, todo: &Todo) -> Result<Todo, RepoError>;
    async fn delete_todo(&self, id: i64) -> Result<(), RepoError>;
}

/// Forwards every call to the repository unchanged.
pub struct DefaultTodoService {
    repo: Arc<dyn TodoRepository>,
}

impl DefaultTodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl TodoService for DefaultTodoService {
    #[instrument(skip(self))]
    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, RepoError> {
        self.repo.create(todo).await
    }

    #[instrument(skip(self))]
    async fn get_todo_by_id(&self, id: i64) -> Result<Todo, RepoError> {
        self.repo.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn get_all_todos(&self) -> Result<Vec<Todo>, RepoError> {
        self.repo.find_all().await
    }

    #[instrument(skip(self, todo), fields(todo.id = todo.id))]
    async fn update_todo(&self, todo: &Todo) -> Result<Todo, RepoError> {
        self.repo.update(todo).await
    }

    #[instrument(skip(self))]
    async fn delete_todo(&self, id: i64) -> Result<(), RepoError> {
        self.repo.delete(id).await
    }
}
