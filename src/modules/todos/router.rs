use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_todo, delete_todo, get_all_todos, get_todo, update_todo};

pub fn init_todos_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_todo).get(get_all_todos))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
}
