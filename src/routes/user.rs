//! User and sign-in routes.

use super::guarded;
use crate::handlers::{auth, delete_user, get_user, list_users, update_user};
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub const USER_READ: &str = "user:read";
pub const USER_WRITE: &str = "user:write";

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", guarded(&state, &[USER_READ], get(list_users)))
        .route(
            "/users/:userId",
            guarded(&state, &[USER_READ], get(get_user))
                .merge(guarded(&state, &[USER_WRITE], patch(update_user)))
                .merge(guarded(&state, &[USER_WRITE], delete(delete_user))),
        )
        .with_state(state)
}

/// POST /auth/callback is open; GET /auth/me only needs an identity.
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/callback", post(auth::callback))
        .route("/auth/me", guarded(&state, &[], get(auth::me)))
        .with_state(state)
}
