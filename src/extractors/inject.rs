//! Per-request service resolution.

use crate::db::Database;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// A service that can be built from application state and a database handle.
pub trait FromAppState: Sized {
    fn from_app_state(state: &AppState, db: &Database) -> Self;
}

/// Extractor for a service `T`. Built only for handlers that ask for it, using the
/// request-scoped `Database` placed by the scope guard when there is one.
pub struct Inject<T>(pub T);

#[async_trait]
impl<T> FromRequestParts<AppState> for Inject<T>
where
    T: FromAppState + Send,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let db = parts
            .extensions
            .get::<Database>()
            .cloned()
            .unwrap_or_else(|| state.db.clone());
        Ok(Inject(T::from_app_state(state, &db)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::service::TodoService;
    use axum::http::Request;

    fn state() -> AppState {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        AppState::new(Database::in_memory(), config)
    }

    #[tokio::test]
    async fn prefers_request_scoped_database() {
        let state = state();
        let scoped = Database::in_memory();
        scoped.todo.create("scoped").await.unwrap();

        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(scoped);
        let Inject(todos) = Inject::<TodoService>::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(todos.get(1).await.unwrap().title, "scoped");
    }

    #[tokio::test]
    async fn falls_back_to_shared_database() {
        let state = state();
        state.db.todo.create("shared").await.unwrap();

        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let Inject(todos) = Inject::<TodoService>::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(todos.get(1).await.unwrap().title, "shared");
    }
}
