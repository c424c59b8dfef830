pub mod cache;
pub mod controller;
pub mod repository;
pub mod router;
pub mod service;

pub use repository::{PgTodoRepository, RepoError, TodoRepository};
pub use router::init_todos_router;
pub use service::{DefaultTodoService, TodoService};
