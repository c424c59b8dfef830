//! # Tasklane Models
//!
//! Domain models and DTOs for the Tasklane API.
//!
//! - [`todos`]: the persisted `Todo` entity and its request/response shapes
//! - [`system`]: small response bodies shared across routes

pub mod system;
pub mod todos;

pub use system::{MessageResponse, ServiceInfo};
pub use todos::{CreateTodoRequest, NewTodo, Todo, TodoResponse, UpdateTodoRequest};
