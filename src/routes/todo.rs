//! Todo routes, guarded by `todo:read` / `todo:write`.

use super::guarded;
use crate::handlers::{create_todo, delete_todo, get_todo, list_todos, rename_todo};
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub const TODO_READ: &str = "todo:read";
pub const TODO_WRITE: &str = "todo:write";

pub fn todo_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            guarded(&state, &[TODO_READ], get(list_todos))
                .merge(guarded(&state, &[TODO_WRITE], post(create_todo))),
        )
        .route(
            "/todos/:id",
            guarded(&state, &[TODO_READ], get(get_todo))
                .merge(guarded(&state, &[TODO_WRITE], patch(rename_todo)))
                .merge(guarded(&state, &[TODO_WRITE], delete(delete_todo))),
        )
        .with_state(state)
}
