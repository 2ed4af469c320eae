//! Router assembly. Each group owns its paths; `app` merges them and adds the HTTP layers.

mod common;
mod devtools;
mod todo;
mod user;

pub use common::common_routes;
pub use devtools::devtools_routes;
pub use todo::{todo_routes, TODO_READ, TODO_WRITE};
pub use user::{auth_routes, user_routes, USER_READ, USER_WRITE};

use crate::auth::{scope_guard, ScopeGuard};
use crate::extractors::MAX_BODY_BYTES;
use crate::state::AppState;
use axum::{middleware, routing::MethodRouter, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Wrap `route` so it only runs for callers holding every scope in `scopes`.
pub fn guarded(state: &AppState, scopes: &[&str], route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        ScopeGuard::new(state.clone(), scopes.iter().copied()),
        scope_guard,
    ))
}

/// The full application router.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(todo_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(auth_routes(state.clone()));
    if state.config.devtools {
        router = router.merge(devtools_routes(state));
    }
    router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
