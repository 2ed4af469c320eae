//! Devtools routes. Mounted only when `AppConfig::devtools` is set.

use crate::handlers::devtools::{get_store, outdated, package, panel, patch_store};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn devtools_routes(state: AppState) -> Router {
    Router::new()
        .route("/devtools", get(panel))
        .route("/devtools/package", get(package))
        .route("/devtools/package/outdated", post(outdated))
        .route("/devtools/store", get(get_store).patch(patch_store))
        .with_state(state)
}
